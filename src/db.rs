use futures::future::BoxFuture;
use uuid::Uuid;

use crate::errors::BackendError;
use crate::recording::{NewRecording, Recording};
use crate::text::{Text, TextCounts};

#[cfg(test)]
pub(crate) mod mock;

/// The text and recording stores.
pub trait Db {
    fn count_texts(&self) -> BoxFuture<Result<TextCounts, BackendError>>;

    /// Finds a text whose content is exactly `content`, optionally
    /// ignoring texts that have already been recorded.
    fn find_text_by_content(
        &self,
        content: &str,
        unrecorded_only: bool,
    ) -> BoxFuture<Result<Option<Text>, BackendError>>;

    /// Finds any text that hasn't been recorded. No ordering is
    /// guaranteed.
    fn find_unrecorded_text(&self) -> BoxFuture<Result<Option<Text>, BackendError>>;

    fn insert_recording(
        &self,
        recording: NewRecording,
    ) -> BoxFuture<Result<Recording, BackendError>>;

    fn insert_text(&self, content: &str) -> BoxFuture<Result<Text, BackendError>>;

    /// Inserts every given text, returning how many were created.
    fn insert_texts(&self, contents: Vec<String>) -> BoxFuture<Result<u64, BackendError>>;

    /// Fails with [`BackendError::NonExistentText`] if there is no
    /// such text.
    fn mark_text_recorded(&self, id: &Uuid) -> BoxFuture<Result<(), BackendError>>;

    /// Returns every recording, newest first.
    fn retrieve_recordings(&self) -> BoxFuture<Result<Vec<Recording>, BackendError>>;
}

pub use self::postgres::*;

mod postgres {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use sqlx::postgres::PgPool;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::errors::BackendError;
    use crate::recording::{NewRecording, Recording};
    use crate::text::{Text, TextCounts};

    pub struct PgDb {
        pool: PgPool,
    }

    impl PgDb {
        pub fn new(pool: PgPool) -> Self {
            PgDb { pool }
        }
    }

    // these can be simplified once async functions in traits are stabilized
    impl super::Db for PgDb {
        fn count_texts(&self) -> BoxFuture<Result<TextCounts, BackendError>> {
            async move {
                let query = sqlx::query_as::<_, (i64, i64)>(include_str!("queries/count_texts.sql"));

                let (total, recorded) = query.fetch_one(&self.pool).await.map_err(map_sqlx_error)?;

                Ok(TextCounts { total, recorded })
            }
            .boxed()
        }

        fn find_text_by_content(
            &self,
            content: &str,
            unrecorded_only: bool,
        ) -> BoxFuture<Result<Option<Text>, BackendError>> {
            let content = content.to_owned();

            async move {
                let query =
                    sqlx::query_as::<_, Text>(include_str!("queries/find_text_by_content.sql"));

                let text = query
                    .bind(content)
                    .bind(unrecorded_only)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(text)
            }
            .boxed()
        }

        fn find_unrecorded_text(&self) -> BoxFuture<Result<Option<Text>, BackendError>> {
            async move {
                let query =
                    sqlx::query_as::<_, Text>(include_str!("queries/find_unrecorded_text.sql"));

                let text = query
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(text)
            }
            .boxed()
        }

        fn insert_recording(
            &self,
            recording: NewRecording,
        ) -> BoxFuture<Result<Recording, BackendError>> {
            async move {
                let query = sqlx::query_as(include_str!("queries/insert_recording.sql"));

                let (id, created_at): (Uuid, OffsetDateTime) = query
                    .bind(&recording.user_email)
                    .bind(&recording.user_name)
                    .bind(&recording.audio_url)
                    .bind(&recording.transcript)
                    .bind(&recording.text_id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(recording.into_recording(id, created_at))
            }
            .boxed()
        }

        fn insert_text(&self, content: &str) -> BoxFuture<Result<Text, BackendError>> {
            let content = content.to_owned();

            async move {
                let query = sqlx::query_as::<_, Text>(include_str!("queries/insert_text.sql"));

                let text = query
                    .bind(content)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(text)
            }
            .boxed()
        }

        fn insert_texts(&self, contents: Vec<String>) -> BoxFuture<Result<u64, BackendError>> {
            async move {
                let query = sqlx::query(include_str!("queries/insert_texts.sql"));

                let count = query
                    .bind(contents)
                    .execute(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?
                    .rows_affected();

                Ok(count)
            }
            .boxed()
        }

        fn mark_text_recorded(&self, id: &Uuid) -> BoxFuture<Result<(), BackendError>> {
            let id = *id;

            async move {
                let query = sqlx::query(include_str!("queries/mark_text_recorded.sql"));

                let count = query
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?
                    .rows_affected();

                if count == 0 {
                    Err(BackendError::NonExistentText(id))
                } else {
                    Ok(())
                }
            }
            .boxed()
        }

        fn retrieve_recordings(&self) -> BoxFuture<Result<Vec<Recording>, BackendError>> {
            async move {
                let query =
                    sqlx::query_as::<_, Recording>(include_str!("queries/retrieve_recordings.sql"));

                let recordings = query
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(recordings)
            }
            .boxed()
        }
    }

    fn map_sqlx_error(error: sqlx::Error) -> BackendError {
        BackendError::Sqlx { source: error }
    }
}
