//! Generic helpers shared by cloud client implementations.
//!
//! - [`parse_resource_uri`] - Split `scheme://a/b/c` URIs
//! - [`validate_resource_name`] - Validate bucket-style resource names
//! - [`validate_key_path`] - Validate object keys
//! - [`validate_identifier`] - Validate SQL schema/table identifiers
//! - [`IntoCloudError`] - Lift foreign errors into [`CloudIOError`]

use crate::io::cloud::traits::{CloudIOError, CloudResult, ErrorKind};

// ============================================================================
// URI Parsing
// ============================================================================

/// Parse a resource URI into its scheme and `/`-separated parts.
///
/// ```
/// use table_transfer::io::cloud::helpers::parse_resource_uri;
///
/// let (scheme, parts) = parse_resource_uri("s3://my-bucket/path/to/file.csv").unwrap();
/// assert_eq!(scheme, "s3");
/// assert_eq!(parts, vec!["my-bucket", "path", "to", "file.csv"]);
/// ```
///
/// # Errors
///
/// Returns an `InvalidInput` error if the URI has no `://` separator.
pub fn parse_resource_uri(uri: &str) -> CloudResult<(String, Vec<String>)> {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return Err(CloudIOError::new(
            ErrorKind::InvalidInput,
            format!("Invalid resource URI format: {uri}"),
        ));
    };

    let path_parts: Vec<String> = rest
        .split('/')
        .map(std::string::ToString::to_string)
        .collect();

    Ok((scheme.to_ascii_lowercase(), path_parts))
}

// ============================================================================
// Validation Helpers
// ============================================================================

/// Validate a resource name according to common cloud provider rules
///
/// # Errors
///
/// Returns an error if:
/// - The resource name is empty
/// - The resource name exceeds 255 characters
/// - The resource name contains invalid characters (only alphanumeric, hyphens, underscores, and periods are allowed)
pub fn validate_resource_name(name: &str) -> CloudResult<()> {
    if name.is_empty() {
        return Err(CloudIOError::new(
            ErrorKind::InvalidInput,
            "Resource name cannot be empty",
        ));
    }

    if name.len() > 255 {
        return Err(CloudIOError::new(
            ErrorKind::InvalidInput,
            "Resource name too long (max 255 characters)",
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(CloudIOError::new(
            ErrorKind::InvalidInput,
            format!("Resource name contains invalid characters: {name}"),
        ));
    }

    Ok(())
}

/// Validate a key path (for object storage)
///
/// # Errors
///
/// Returns an error if:
/// - The key path is empty
/// - The key path starts with a forward slash
pub fn validate_key_path(path: &str) -> CloudResult<()> {
    if path.is_empty() {
        return Err(CloudIOError::new(
            ErrorKind::InvalidInput,
            "Key path cannot be empty",
        ));
    }

    if path.starts_with('/') {
        return Err(CloudIOError::new(
            ErrorKind::InvalidInput,
            "Key path cannot start with '/'",
        ));
    }

    Ok(())
}

/// Validate an unquoted SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`).
///
/// Schema and table names end up spliced into `COPY`/`TRUNCATE` statements, so anything
/// outside this alphabet is rejected rather than quoted.
///
/// # Errors
///
/// Returns an `InvalidInput` error if the identifier is empty, longer than 63 bytes, or
/// contains other characters.
pub fn validate_identifier(name: &str) -> CloudResult<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || name.len() > 63 || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(CloudIOError::new(
            ErrorKind::InvalidInput,
            format!("Invalid SQL identifier: {name:?}"),
        ));
    }
    Ok(())
}

// ============================================================================
// Error Conversion Helpers
// ============================================================================

/// Convert common error types to `CloudIOError`
pub trait IntoCloudError<T> {
    /// Convert a standard Result to a cloud IO Result
    ///
    /// # Errors
    ///
    /// Returns a `CloudIOError` with the specified kind if the Result is an error
    fn into_cloud_error(self, kind: ErrorKind) -> CloudResult<T>;
}

impl<T, E: std::error::Error> IntoCloudError<T> for std::result::Result<T, E> {
    fn into_cloud_error(self, kind: ErrorKind) -> CloudResult<T> {
        self.map_err(|e| CloudIOError::new(kind, e.to_string()))
    }
}
