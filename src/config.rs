//! Environment-driven settings for remote storage.
//!
//! Credentials never travel through `ingest`/`emit`; they are read here once and handed to a
//! client such as [`S3ObjectIO`](crate::io::cloud::s3::S3ObjectIO) at construction time.
//! Every loader has a `from_lookup` twin taking a closure, so tests can supply variables
//! without touching the process environment.

use crate::error::{Result, TransferError};
use crate::io::cloud::traits::{CloudConfig, CloudCredentials, CloudIOError, CloudResult, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const REGION_VAR: &str = "S3_REGION_NAME";
pub const ENDPOINT_VAR: &str = "S3_ENDPOINT_URL";
pub const TIMEOUT_VAR: &str = "S3_TIMEOUT_SECS";

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Looks a variable up, treating blank values as unset.
fn non_blank<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Access key pair for S3-compatible storage.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

impl StaticCredentials {
    /// Read `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` if either variable is missing or blank.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` if either variable is missing or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            non_blank(&lookup, name)
                .ok_or_else(|| TransferError::access_denied(format!("{name} is not set")))
        };
        Ok(Self {
            access_key_id: required(ACCESS_KEY_ID_VAR)?,
            secret_access_key: required(SECRET_ACCESS_KEY_VAR)?,
        })
    }
}

impl CloudCredentials for StaticCredentials {
    fn identifier(&self) -> &str {
        &self.access_key_id
    }

    fn credential_type(&self) -> &str {
        "access_key"
    }

    fn validate(&self) -> CloudResult<()> {
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return Err(CloudIOError::new(
                ErrorKind::Authentication,
                "access key id and secret access key are both required",
            ));
        }
        Ok(())
    }
}

/// Region, endpoint and timeout for S3-compatible storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    pub region: String,
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ObjectStoreConfig {
    /// Read `S3_REGION_NAME`, `S3_ENDPOINT_URL` and `S3_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the timeout is not a positive integer.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the timeout is not a positive integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let timeout_secs = match non_blank(&lookup, TIMEOUT_VAR) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    TransferError::invalid_input(format!(
                        "{TIMEOUT_VAR} must be a positive integer, got {raw:?}"
                    ))
                })?,
            None => defaults.timeout_secs,
        };
        Ok(Self {
            region: non_blank(&lookup, REGION_VAR).unwrap_or(defaults.region),
            endpoint: non_blank(&lookup, ENDPOINT_VAR),
            timeout_secs,
        })
    }
}

impl CloudConfig for ObjectStoreConfig {
    fn region(&self) -> Option<&str> {
        Some(&self.region)
    }

    fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}
