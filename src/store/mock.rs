use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use futures::future::{BoxFuture, FutureExt};
use rusoto_core::RusotoError;
use url::{ParseError, Url};

use crate::errors::BackendError;
use crate::store::Store;

/// Keeps uploads in memory, keyed by object key.
pub(crate) struct MockStore {
    pub(crate) map: RwLock<HashMap<String, (String, Vec<u8>)>>,
    pub(crate) failing: AtomicBool,
    base_url: Url,
}

impl MockStore {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        MockStore {
            map: RwLock::default(),
            failing: AtomicBool::new(false),
            base_url: Url::parse(base_url.as_ref()).expect("parse mock store base URL"),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Store for MockStore {
    fn get_url(&self, key: &str) -> Result<Url, ParseError> {
        self.base_url.join(key)
    }

    fn save(
        &self,
        key: String,
        content_type: String,
        raw: Vec<u8>,
    ) -> BoxFuture<Result<Url, BackendError>> {
        mock_save(self, key, content_type, raw).boxed()
    }
}

async fn mock_save(
    store: &MockStore,
    key: String,
    content_type: String,
    raw: Vec<u8>,
) -> Result<Url, BackendError> {
    if store.failing.load(Ordering::SeqCst) {
        return Err(BackendError::UploadFailed {
            source: RusotoError::Validation("store is down".to_owned()),
        });
    }

    let url = store
        .get_url(&key)
        .map_err(|source| BackendError::FailedToGenerateUrl { source })?;

    store.map.write().unwrap().insert(key, (content_type, raw));

    Ok(url)
}
