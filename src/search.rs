use std::sync::Arc;

use crate::db::Db;
use crate::errors::BackendError;
use crate::recording::Recording;

#[derive(Clone)]
pub struct SearchService {
    db: Arc<dyn Db + Send + Sync>,
}

impl SearchService {
    pub fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        SearchService { db }
    }

    /// Returns every recording whose transcript contains `query`,
    /// ignoring case, newest first. This scans all recordings, so a
    /// blank query returns nothing without reading any.
    pub async fn search_by_transcript(&self, query: &str) -> Result<Vec<Recording>, BackendError> {
        if query.trim().is_empty() {
            return Ok(vec![]);
        }

        let query = query.to_lowercase();

        let recordings = self.db.retrieve_recordings().await?;

        Ok(recordings
            .into_iter()
            .filter(|r| r.transcript.to_lowercase().contains(&query))
            .collect())
    }

    /// Returns every recording, newest first.
    pub async fn list_recordings(&self) -> Result<Vec<Recording>, BackendError> {
        self.db.retrieve_recordings().await
    }
}
