use rusoto_core::RusotoError;
use rusoto_s3::PutObjectError;
use thiserror::Error;
use uuid::Uuid;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Represents an SQL error.
    #[error("database unavailable")]
    Sqlx { source: sqlx::Error },

    /// Represents an error returned by the blob store when uploading.
    #[error("failed to upload to store")]
    UploadFailed { source: RusotoError<PutObjectError> },

    /// Represents an error joining a key to the public base URL.
    #[error("failed to generate URL")]
    FailedToGenerateUrl { source: url::ParseError },

    /// Represents a blank user key passed to the assignment service.
    #[error("user key must not be empty")]
    EmptyUserKey,

    /// Represents a request without identity headers.
    #[error("not authenticated")]
    Unauthenticated,

    /// Represents a non-admin user on an admin route.
    #[error("admins only")]
    Forbidden,

    /// Represents an attempt to update a text that doesn't exist.
    #[error("no text with ID {0}")]
    NonExistentText(Uuid),

    /// Represents an unparseable ID.
    #[error("invalid ID {0}")]
    InvalidId(String),

    /// Represents an error caused by missing parts in a form submission.
    #[error("missing parts")]
    PartsMissing,

    /// Represents a form submission that couldn't be read.
    #[error("malformed form submission")]
    MalformedFormSubmission,

    /// Represents an import file that isn't valid UTF-8.
    #[error("malformed CSV file")]
    MalformedCsv,

    /// Represents an upload that isn't audio.
    #[error("unsupported media type {0}")]
    UnsupportedMediaType(String),
}
