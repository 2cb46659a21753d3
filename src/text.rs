use serde::Serialize;
use uuid::Uuid;

/// A prompt that users read aloud.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Text {
    /// The ID of the text.
    pub(crate) id: Uuid,

    /// What the user reads. May equal a user's key, in which case the
    /// text is that user's reservation.
    pub(crate) content: String,

    /// Whether a recording of this text has been submitted. Never
    /// reverts to `false`.
    pub(crate) recorded: bool,
}

impl Text {
    pub fn new(id: Uuid, content: String, recorded: bool) -> Self {
        Text {
            id,
            content,
            recorded,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_recorded(&self) -> bool {
        self.recorded
    }
}

/// Aggregate counts over all texts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextCounts {
    pub total: i64,
    pub recorded: i64,
}
