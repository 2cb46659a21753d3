use std::sync::Arc;

use log::{debug, warn, Logger};
use uuid::Uuid;

use crate::db::Db;
use crate::errors::BackendError;
use crate::normalization::normalize_text;
use crate::text::Text;

/// Decides which text each user records next and keeps the text store
/// up to date as recordings come in.
#[derive(Clone)]
pub struct AssignmentService {
    logger: Arc<Logger>,
    db: Arc<dyn Db + Send + Sync>,
}

impl AssignmentService {
    pub fn new(logger: Arc<Logger>, db: Arc<dyn Db + Send + Sync>) -> Self {
        AssignmentService { logger, db }
    }

    /// Creates the user's reserved text unless one already exists.
    ///
    /// The check and the insertion are separate statements, so two
    /// concurrent first requests for the same key may both insert.
    pub async fn ensure_reservation(&self, user_key: &str) -> Result<(), BackendError> {
        let user_key = validate_key(user_key)?;

        let existing = self.db.find_text_by_content(&user_key, false).await?;

        if existing.is_none() {
            debug!(self.logger, "Creating reservation..."; "user_key" => &user_key);
            self.db.insert_text(&user_key).await?;
        }

        Ok(())
    }

    /// Returns the user's own unrecorded reservation if there is one,
    /// otherwise any unrecorded text, otherwise `None` once everything
    /// has been recorded.
    pub async fn get_assignment(&self, user_key: &str) -> Result<Option<Text>, BackendError> {
        let user_key = validate_key(user_key)?;

        if let Some(text) = self.db.find_text_by_content(&user_key, true).await? {
            return Ok(Some(text));
        }

        self.next_unrecorded().await
    }

    pub async fn next_unrecorded(&self) -> Result<Option<Text>, BackendError> {
        self.db.find_unrecorded_text().await
    }

    /// Marks the text as recorded. Returns `false`, after logging a
    /// warning, if there is no such text.
    pub async fn mark_recorded(&self, text_id: &Uuid) -> Result<bool, BackendError> {
        match self.db.mark_text_recorded(text_id).await {
            Ok(()) => Ok(true),
            Err(BackendError::NonExistentText(id)) => {
                warn!(self.logger, "Tried to mark unknown text as recorded"; "text_id" => %id);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Creates a text for every entry that isn't blank. Returns the
    /// number created.
    pub async fn bulk_import<I, S>(&self, texts: I) -> Result<u64, BackendError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let texts = texts
            .into_iter()
            .map(normalize_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>();

        if texts.is_empty() {
            return Ok(0);
        }

        debug!(self.logger, "Importing texts..."; "count" => texts.len());
        self.db.insert_texts(texts).await
    }
}

fn validate_key(user_key: &str) -> Result<String, BackendError> {
    let user_key = normalize_text(user_key);

    if user_key.is_empty() {
        Err(BackendError::EmptyUserKey)
    } else {
        Ok(user_key)
    }
}
