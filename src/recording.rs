use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::identity::Identity;

/// A single submitted recording.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Recording {
    /// The ID of the recording.
    pub(crate) id: Uuid,

    /// The email of the user who uploaded it.
    pub(crate) user_email: String,

    /// The display name of the user who uploaded it, if known.
    pub(crate) user_name: Option<String>,

    /// The public URL of the audio. Never interpreted.
    pub(crate) audio_url: String,

    /// The text the user was reading.
    pub(crate) transcript: String,

    /// The text the client said was recorded, if any. Not enforced
    /// as a reference.
    pub(crate) text_id: Option<Uuid>,

    /// When it was created.
    #[serde(with = "time::serde::timestamp")]
    pub(crate) created_at: OffsetDateTime,
}

impl Recording {
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn user_email(&self) -> &str {
        &self.user_email
    }

    pub fn audio_url(&self) -> &str {
        &self.audio_url
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn text_id(&self) -> Option<&Uuid> {
        self.text_id.as_ref()
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

/// A recording before it's written to the database.
#[derive(Clone, Debug)]
pub struct NewRecording {
    pub(crate) user_email: String,
    pub(crate) user_name: Option<String>,
    pub(crate) audio_url: String,
    pub(crate) transcript: String,
    pub(crate) text_id: Option<Uuid>,
}

impl NewRecording {
    pub fn new(
        identity: &Identity,
        audio_url: impl Into<String>,
        transcript: impl Into<String>,
        text_id: Option<Uuid>,
    ) -> Self {
        NewRecording {
            user_email: identity.email().to_owned(),
            user_name: identity.name().map(ToOwned::to_owned),
            audio_url: audio_url.into(),
            transcript: transcript.into(),
            text_id,
        }
    }

    pub fn into_recording(self, id: Uuid, created_at: OffsetDateTime) -> Recording {
        Recording {
            id,
            user_email: self.user_email,
            user_name: self.user_name,
            audio_url: self.audio_url,
            transcript: self.transcript,
            text_id: self.text_id,
            created_at,
        }
    }
}
