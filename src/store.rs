use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use rusoto_s3::{PutObjectRequest, S3Client, StreamingBody, S3};
use url::{ParseError, Url};

use crate::errors::BackendError;

#[cfg(test)]
pub(crate) mod mock;

pub trait Store: Send + Sync {
    /// Gets the public URL for the given object.
    fn get_url(&self, key: &str) -> Result<Url, ParseError>;

    /// Saves the given data under the given key and returns its public
    /// URL.
    fn save(
        &self,
        key: String,
        content_type: String,
        raw: Vec<u8>,
    ) -> BoxFuture<Result<Url, BackendError>>;
}

/// A store that saves its data to S3.
pub struct S3Store {
    client: Arc<S3Client>,
    acl: String,
    bucket: String,
    cache_control: String,
    base_url: Url,
}

impl S3Store {
    /// Creates a new instance.
    pub fn new(
        client: Arc<S3Client>,
        acl: String,
        bucket: String,
        cache_control: String,
        base_url: Url,
    ) -> Self {
        Self {
            client,
            acl,
            bucket,
            cache_control,
            base_url,
        }
    }

    pub fn from_env() -> Result<Self, rusoto_core::request::TlsError> {
        use rusoto_core::request::HttpClient;
        use rusoto_core::Region;
        use rusoto_credential::StaticProvider;

        use crate::config::get_variable;

        let access_key = get_variable("S3_ACCESS_KEY");
        let secret_access_key = get_variable("S3_SECRET_ACCESS_KEY");

        let region = Region::Custom {
            name: get_variable("S3_REGION_NAME"),
            endpoint: get_variable("S3_ENDPOINT"),
        };

        let bucket = get_variable("S3_BUCKET_NAME");
        let acl = get_variable("VOICEBANK_S3_ACL");
        let cache_control = get_variable("VOICEBANK_S3_CACHE_CONTROL");

        let client = Arc::new(S3Client::new_with(
            HttpClient::new()?,
            StaticProvider::new_minimal(access_key, secret_access_key),
            region,
        ));

        let base_url = Url::parse(&get_variable("S3_BASE_URL")).expect("parse S3_BASE_URL");

        Ok(S3Store::new(client, acl, bucket, cache_control, base_url))
    }
}

impl Store for S3Store {
    fn get_url(&self, key: &str) -> Result<Url, ParseError> {
        self.base_url.join(key)
    }

    fn save(
        &self,
        key: String,
        content_type: String,
        raw: Vec<u8>,
    ) -> BoxFuture<Result<Url, BackendError>> {
        upload(self, key, content_type, raw).boxed()
    }
}

async fn upload(
    store: &S3Store,
    key: String,
    content_type: String,
    raw: Vec<u8>,
) -> Result<Url, BackendError> {
    use std::convert::TryFrom;

    let url = store
        .get_url(&key)
        .map_err(|source| BackendError::FailedToGenerateUrl { source })?;

    let len = i64::try_from(raw.len()).expect("raw data length must be within range of i64");

    let request = PutObjectRequest {
        acl: Some(store.acl.clone()),
        body: Some(StreamingBody::from(raw)),
        bucket: store.bucket.clone(),
        cache_control: Some(store.cache_control.clone()),
        content_length: Some(len),
        content_type: Some(content_type),
        key,
        ..Default::default()
    };

    let result = store.client.put_object(request).await;

    match result {
        Ok(_) => Ok(url),
        Err(e) => Err(BackendError::UploadFailed { source: e }),
    }
}

/// Builds the object key for an upload: the prefix, a fresh UUID, and
/// the client's file name with anything outside `[A-Za-z0-9._-]`
/// replaced.
pub fn object_key(prefix: &str, filename: Option<&str>) -> String {
    let filename = filename
        .map(|f| f.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(f))
        .unwrap_or("")
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect::<String>();

    let filename = if filename.is_empty() {
        "recording".to_owned()
    } else {
        filename
    };

    format!("{}{}_{}", prefix, uuid::Uuid::new_v4(), filename)
}

#[cfg(test)]
mod tests {
    use super::object_key;

    #[test]
    fn object_key_keeps_safe_file_names() {
        let key = object_key("uploads/", Some("take-1.webm"));

        assert!(key.starts_with("uploads/"));
        assert!(key.ends_with("_take-1.webm"));
    }

    #[test]
    fn object_key_strips_paths_and_odd_characters() {
        let key = object_key("uploads/", Some("../../etc/my take?.ogg"));

        assert!(key.ends_with("_my_take_.ogg"));
        assert!(!key.contains(".."));
    }

    #[test]
    fn object_key_has_a_fallback_name() {
        assert!(object_key("", None).ends_with("_recording"));
    }
}
