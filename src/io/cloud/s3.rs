//! S3-compatible object storage backed by the `object_store` crate.
//!
//! [`S3ObjectIO`] exposes the blocking [`ObjectIO`] interface by driving `object_store`'s async
//! client on a private current-thread tokio runtime. One client is built lazily per bucket.
//! Client-side retries are disabled: a failed request is reported immediately.
//!
//! Calling into an `S3ObjectIO` from inside another tokio runtime panics, as with any
//! `Runtime::block_on`.

use crate::config::{ObjectStoreConfig, StaticCredentials};
use crate::error::Result;
use crate::io::cloud::helpers::IntoCloudError;
use crate::io::cloud::traits::{
    CloudConfig, CloudCredentials, CloudIOError, CloudResult, ErrorKind, ObjectIO,
};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::{ClientOptions, ObjectStore, PutPayload, RetryConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

pub struct S3ObjectIO {
    runtime: Runtime,
    credentials: StaticCredentials,
    region: String,
    endpoint: Option<String>,
    timeout: Duration,
    stores: Mutex<HashMap<String, Arc<AmazonS3>>>,
}

impl S3ObjectIO {
    /// Build a client from explicit credentials and endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns an `Authentication` error if the credentials are incomplete, or `Other` if the
    /// runtime cannot be started.
    pub fn new(credentials: StaticCredentials, config: &dyn CloudConfig) -> CloudResult<Self> {
        credentials.validate()?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .into_cloud_error(ErrorKind::Other)?;
        Ok(Self {
            runtime,
            credentials,
            region: config
                .region()
                .unwrap_or(crate::config::DEFAULT_REGION)
                .to_string(),
            endpoint: config.endpoint().map(str::to_string),
            timeout: Duration::from_secs(config.timeout_secs()),
            stores: Mutex::new(HashMap::new()),
        })
    }

    /// Build a client from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `S3_REGION_NAME`,
    /// `S3_ENDPOINT_URL` and `S3_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` if credentials are missing and `InvalidInput` for malformed
    /// settings.
    pub fn from_env() -> Result<Self> {
        let credentials = StaticCredentials::from_env()?;
        let config = ObjectStoreConfig::from_env()?;
        log::info!(
            "Built S3 client for access key {} (region {}, endpoint {})",
            credentials.identifier(),
            config.region,
            config.endpoint.as_deref().unwrap_or("default"),
        );
        Ok(Self::new(credentials, &config)?)
    }

    fn store(&self, bucket: &str) -> CloudResult<Arc<AmazonS3>> {
        let mut stores = self
            .stores
            .lock()
            .map_err(|_| CloudIOError::new(ErrorKind::Other, "store cache mutex poisoned"))?;
        if let Some(store) = stores.get(bucket) {
            return Ok(Arc::clone(store));
        }

        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(bucket)
            .with_region(&self.region)
            .with_access_key_id(&self.credentials.access_key_id)
            .with_secret_access_key(&self.credentials.secret_access_key)
            .with_client_options(ClientOptions::new().with_timeout(self.timeout))
            .with_retry(RetryConfig {
                max_retries: 0,
                ..RetryConfig::default()
            });
        if let Some(endpoint) = &self.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let store = Arc::new(builder.build().map_err(|e| store_error(e, bucket, ""))?);
        stores.insert(bucket.to_string(), Arc::clone(&store));
        Ok(store)
    }
}

fn store_error(err: object_store::Error, bucket: &str, key: &str) -> CloudIOError {
    let kind = match &err {
        object_store::Error::NotFound { .. } => ErrorKind::NotFound,
        object_store::Error::PermissionDenied { .. } => ErrorKind::Authorization,
        object_store::Error::Unauthenticated { .. } => ErrorKind::Authentication,
        object_store::Error::InvalidPath { .. } => ErrorKind::InvalidInput,
        _ => ErrorKind::Network,
    };
    CloudIOError::new(kind, format!("s3://{bucket}/{key}")).with_source(err.to_string())
}

impl ObjectIO for S3ObjectIO {
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> CloudResult<()> {
        let store = self.store(bucket)?;
        let path = ObjectPath::from(key);
        self.runtime
            .block_on(store.put(&path, PutPayload::from(data.to_vec())))
            .map_err(|e| store_error(e, bucket, key))?;
        Ok(())
    }

    fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>> {
        let store = self.store(bucket)?;
        let path = ObjectPath::from(key);
        let bytes = self
            .runtime
            .block_on(async {
                let result = store.get(&path).await?;
                result.bytes().await
            })
            .map_err(|e| store_error(e, bucket, key))?;
        Ok(bytes.to_vec())
    }

    fn object_exists(&self, bucket: &str, key: &str) -> CloudResult<bool> {
        let store = self.store(bucket)?;
        let path = ObjectPath::from(key);
        match self.runtime.block_on(store.head(&path)) {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(store_error(e, bucket, key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::cloud::fake::FakeConfig;

    fn credentials(key: &str) -> StaticCredentials {
        StaticCredentials {
            access_key_id: key.to_string(),
            secret_access_key: "secret".to_string(),
        }
    }

    #[test]
    fn rejects_blank_credentials() {
        let err = S3ObjectIO::new(credentials(""), &FakeConfig::default())
            .err()
            .expect("blank key must fail");
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn stores_are_cached_per_bucket() {
        let config = FakeConfig {
            endpoint: Some("http://127.0.0.1:9000".to_string()),
            ..FakeConfig::default()
        };
        let io = S3ObjectIO::new(credentials("AKIDEXAMPLE"), &config).unwrap();
        let a = io.store("bucket-a").unwrap();
        let again = io.store("bucket-a").unwrap();
        let b = io.store("bucket-b").unwrap();
        assert!(Arc::ptr_eq(&a, &again));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(io.region, "us-east-1");
    }
}
