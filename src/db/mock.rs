use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use futures::future::{BoxFuture, FutureExt};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::Db;
use crate::errors::BackendError;
use crate::recording::{NewRecording, Recording};
use crate::text::{Text, TextCounts};

/// An in-memory stand-in for the database.
#[derive(Default)]
pub(crate) struct MockDb {
    pub(crate) texts: RwLock<Vec<Text>>,
    pub(crate) recordings: RwLock<Vec<Recording>>,
    /// Number of times every recording was read.
    pub(crate) scans: AtomicUsize,
    /// Makes every call fail as if the database were down.
    pub(crate) unavailable: AtomicBool,
}

impl MockDb {
    pub fn with_texts<'a>(contents: impl IntoIterator<Item = &'a str>) -> Self {
        let db = MockDb::default();

        db.texts.write().unwrap().extend(
            contents
                .into_iter()
                .map(|c| Text::new(Uuid::new_v4(), c.to_owned(), false)),
        );

        db
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn texts_with_content(&self, content: &str) -> Vec<Text> {
        self.texts
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.content == content)
            .cloned()
            .collect()
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(BackendError::Sqlx {
                source: sqlx::Error::PoolTimedOut,
            })
        } else {
            Ok(())
        }
    }
}

impl Db for MockDb {
    fn count_texts(&self) -> BoxFuture<Result<TextCounts, BackendError>> {
        async move {
            self.check()?;

            let texts = self.texts.read().unwrap();

            Ok(TextCounts {
                total: texts.len() as i64,
                recorded: texts.iter().filter(|t| t.recorded).count() as i64,
            })
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
            self.check()?;

            Ok(self
                .texts
                .read()
                .unwrap()
                .iter()
                .find(|t| t.content == content && !(unrecorded_only && t.recorded))
                .cloned())
        }
        .boxed()
    }

    fn find_unrecorded_text(&self) -> BoxFuture<Result<Option<Text>, BackendError>> {
        async move {
            self.check()?;

            Ok(self
                .texts
                .read()
                .unwrap()
                .iter()
                .find(|t| !t.recorded)
                .cloned())
        }
        .boxed()
    }

    fn insert_recording(
        &self,
        recording: NewRecording,
    ) -> BoxFuture<Result<Recording, BackendError>> {
        async move {
            self.check()?;

            let recording = recording.into_recording(Uuid::new_v4(), OffsetDateTime::now_utc());
            self.recordings.write().unwrap().push(recording.clone());

            Ok(recording)
        }
        .boxed()
    }

    fn insert_text(&self, content: &str) -> BoxFuture<Result<Text, BackendError>> {
        let content = content.to_owned();

        async move {
            self.check()?;

            let text = Text::new(Uuid::new_v4(), content, false);
            self.texts.write().unwrap().push(text.clone());

            Ok(text)
        }
        .boxed()
    }

    fn insert_texts(&self, contents: Vec<String>) -> BoxFuture<Result<u64, BackendError>> {
        async move {
            self.check()?;

            let count = contents.len() as u64;
            self.texts.write().unwrap().extend(
                contents
                    .into_iter()
                    .map(|c| Text::new(Uuid::new_v4(), c, false)),
            );

            Ok(count)
        }
        .boxed()
    }

    fn mark_text_recorded(&self, id: &Uuid) -> BoxFuture<Result<(), BackendError>> {
        let id = *id;

        async move {
            self.check()?;

            let mut texts = self.texts.write().unwrap();

            match texts.iter_mut().find(|t| t.id == id) {
                Some(text) => {
                    text.recorded = true;
                    Ok(())
                }
                None => Err(BackendError::NonExistentText(id)),
            }
        }
        .boxed()
    }

    fn retrieve_recordings(&self) -> BoxFuture<Result<Vec<Recording>, BackendError>> {
        async move {
            self.check()?;
            self.scans.fetch_add(1, Ordering::SeqCst);

            let mut recordings = self.recordings.read().unwrap().clone();
            recordings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

            Ok(recordings)
        }
        .boxed()
    }
}
