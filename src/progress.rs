use std::sync::Arc;

use serde::Serialize;

use crate::db::Db;
use crate::errors::BackendError;
use crate::text::TextCounts;

/// How much of the text store has been recorded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Progress {
    pub total: i64,
    pub recorded: i64,
    pub pending: i64,
    pub percent: f64,
}

impl From<TextCounts> for Progress {
    fn from(counts: TextCounts) -> Self {
        let TextCounts { total, recorded } = counts;

        let percent = if total > 0 {
            recorded as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Progress {
            total,
            recorded,
            pending: total - recorded,
            percent,
        }
    }
}

#[derive(Clone)]
pub struct ProgressService {
    db: Arc<dyn Db + Send + Sync>,
}

impl ProgressService {
    pub fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        ProgressService { db }
    }

    /// Counts the texts afresh on every call.
    pub async fn get_progress(&self) -> Result<Progress, BackendError> {
        let counts = self.db.count_texts().await?;

        Ok(Progress::from(counts))
    }
}
