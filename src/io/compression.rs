//! Pluggable compression for stored bytes.
//!
//! Storage backends hand whole objects around, so codecs here work on byte buffers rather
//! than streams. Selection follows the location's path:
//!
//! - **On read**: the path extension picks the codec; if the extension names none, a codec
//!   with a binary magic signature matching the payload is used; otherwise the bytes pass
//!   through untouched.
//! - **On write**: only the path extension is consulted.
//!
//! ## Built-in Codecs
//!
//! When enabled via feature flags, the following codecs are available:
//! - **Gzip** (`.gz`) - via `flate2` crate (feature: `compression-gzip`)
//! - **Zstd** (`.zst`) - via `zstd` crate (feature: `compression-zstd`)
//! - **Bzip2** (`.bz2`) - via `bzip2` crate (feature: `compression-bzip2`)
//! - **Xz** (`.xz`) - via `xz2` crate (feature: `compression-xz`)
//!
//! ## Custom Codec Implementation
//! ```
//! use table_transfer::io::compression::{register_codec, CompressionCodec};
//! use std::sync::Arc;
//!
//! struct Identity;
//!
//! impl CompressionCodec for Identity {
//!     fn name(&self) -> &str { "identity" }
//!     fn extensions(&self) -> &[&str] { &[".id"] }
//!     fn magic_bytes(&self) -> Option<&[u8]> { None }
//!     fn compress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> { Ok(data.to_vec()) }
//!     fn decompress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> { Ok(data.to_vec()) }
//! }
//!
//! register_codec(Arc::new(Identity));
//! ```

use crate::error::{Result, TransferError};
use std::sync::{Arc, PoisonError, RwLock};

/// Global codec registry for pluggable compression support.
static CODEC_REGISTRY: RwLock<Option<Vec<Arc<dyn CompressionCodec>>>> = RwLock::new(None);

/// Initialize the codec registry with built-in codecs.
fn init_registry() -> Vec<Arc<dyn CompressionCodec>> {
    vec![
        #[cfg(feature = "compression-gzip")]
        Arc::new(GzipCodec),
        #[cfg(feature = "compression-zstd")]
        Arc::new(ZstdCodec),
        #[cfg(feature = "compression-bzip2")]
        Arc::new(Bzip2Codec),
        #[cfg(feature = "compression-xz")]
        Arc::new(XzCodec),
    ]
}

/// Get or initialize the global codec registry.
fn get_registry() -> Vec<Arc<dyn CompressionCodec>> {
    let mut lock = CODEC_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    lock.get_or_insert_with(init_registry).clone()
}

/// Register a custom compression codec globally.
///
/// Codecs registered later are consulted after the built-in ones.
pub fn register_codec(codec: Arc<dyn CompressionCodec>) {
    let mut lock = CODEC_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    lock.get_or_insert_with(init_registry).push(codec);
}

/// Pluggable compression codec trait.
///
/// Implementations must be `Send + Sync` as they're stored in a global registry.
pub trait CompressionCodec: Send + Sync {
    /// Human-readable codec name (e.g., "gzip", "zstd").
    fn name(&self) -> &str;

    /// File extensions associated with this codec (e.g., `&[".gz", ".gzip"]`).
    ///
    /// Extensions should include the leading dot and be lowercase.
    fn extensions(&self) -> &[&str];

    /// Optional magic byte signature for content-based detection.
    ///
    /// Return `None` if the format has no reliable magic bytes.
    fn magic_bytes(&self) -> Option<&[u8]>;

    /// Compress a whole buffer.
    fn compress(&self, data: &[u8]) -> std::io::Result<Vec<u8>>;

    /// Decompress a whole buffer.
    fn decompress(&self, data: &[u8]) -> std::io::Result<Vec<u8>>;
}

/// Returns the registered codec whose extension ends `path`, if any.
///
/// Matching is case-insensitive.
#[must_use]
pub fn codec_for_path(path: &str) -> Option<Arc<dyn CompressionCodec>> {
    get_registry().into_iter().find(|codec| {
        codec
            .extensions()
            .iter()
            .any(|ext| ends_with_ignore_case(path, ext))
    })
}

fn ends_with_ignore_case(path: &str, ext: &str) -> bool {
    path.len()
        .checked_sub(ext.len())
        .and_then(|start| path.get(start..))
        .is_some_and(|tail| tail.eq_ignore_ascii_case(ext))
}

fn codec_for_magic(data: &[u8]) -> Option<Arc<dyn CompressionCodec>> {
    get_registry().into_iter().find(|codec| {
        codec
            .magic_bytes()
            .is_some_and(|magic| data.starts_with(magic))
    })
}

/// Strips a recognized compression extension: `people.csv.gz` becomes `people.csv`.
#[must_use]
pub fn strip_compression_extension(path: &str) -> &str {
    for codec in get_registry() {
        for ext in codec.extensions() {
            if ends_with_ignore_case(path, ext) {
                return &path[..path.len() - ext.len()];
            }
        }
    }
    path
}

/// Decompress bytes read from `path_hint` if they are compressed.
///
/// # Errors
///
/// Returns `MalformedInput` if the selected codec rejects the payload.
pub fn decompress(data: Vec<u8>, path_hint: &str) -> Result<Vec<u8>> {
    let Some(codec) = codec_for_path(path_hint).or_else(|| codec_for_magic(&data)) else {
        return Ok(data);
    };
    log::debug!("Decompressing {path_hint} with {}", codec.name());
    codec.decompress(&data).map_err(|e| {
        TransferError::malformed(format!("{} decompression of {path_hint} failed", codec.name()))
            .with_source(e.to_string())
    })
}

/// Compress bytes bound for `path_hint` when its extension names a codec.
///
/// # Errors
///
/// Returns `Io` if the codec fails.
pub fn compress(data: Vec<u8>, path_hint: &str) -> Result<Vec<u8>> {
    let Some(codec) = codec_for_path(path_hint) else {
        return Ok(data);
    };
    log::debug!("Compressing {path_hint} with {}", codec.name());
    codec.compress(&data).map_err(|e| {
        TransferError::io(format!("{} compression of {path_hint} failed", codec.name()))
            .with_source(e.to_string())
    })
}

// ============================================================================
// Built-in Codec Implementations
// ============================================================================

#[cfg(feature = "compression-gzip")]
struct GzipCodec;

#[cfg(feature = "compression-gzip")]
impl CompressionCodec for GzipCodec {
    fn name(&self) -> &str {
        "gzip"
    }

    fn extensions(&self) -> &[&str] {
        &[".gz", ".gzip"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(&[0x1f, 0x8b])
    }

    fn compress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decompress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        use flate2::read::MultiGzDecoder;
        use std::io::Read;
        let mut out = Vec::new();
        MultiGzDecoder::new(data).read_to_end(&mut out)?;
        Ok(out)
    }
}

#[cfg(feature = "compression-zstd")]
struct ZstdCodec;

#[cfg(feature = "compression-zstd")]
impl CompressionCodec for ZstdCodec {
    fn name(&self) -> &str {
        "zstd"
    }

    fn extensions(&self) -> &[&str] {
        &[".zst", ".zstd"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(&[0x28, 0xb5, 0x2f, 0xfd])
    }

    fn compress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        zstd::encode_all(data, 3)
    }

    fn decompress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        zstd::decode_all(data)
    }
}

#[cfg(feature = "compression-bzip2")]
struct Bzip2Codec;

#[cfg(feature = "compression-bzip2")]
impl CompressionCodec for Bzip2Codec {
    fn name(&self) -> &str {
        "bzip2"
    }

    fn extensions(&self) -> &[&str] {
        &[".bz2", ".bzip2"]
    }

    // "BZh" is plain ASCII and could open a CSV header, so bzip2 is detected by extension only.
    fn magic_bytes(&self) -> Option<&[u8]> {
        None
    }

    fn compress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        use bzip2::Compression;
        use bzip2::write::BzEncoder;
        use std::io::Write;
        let mut encoder = BzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decompress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        use bzip2::read::BzDecoder;
        use std::io::Read;
        let mut out = Vec::new();
        BzDecoder::new(data).read_to_end(&mut out)?;
        Ok(out)
    }
}

#[cfg(feature = "compression-xz")]
struct XzCodec;

#[cfg(feature = "compression-xz")]
impl CompressionCodec for XzCodec {
    fn name(&self) -> &str {
        "xz"
    }

    fn extensions(&self) -> &[&str] {
        &[".xz"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(&[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00])
    }

    fn compress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        use std::io::Write;
        use xz2::write::XzEncoder;
        let mut encoder = XzEncoder::new(Vec::new(), 6);
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decompress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        use std::io::Read;
        use xz2::read::XzDecoder;
        let mut out = Vec::new();
        XzDecoder::new(data).read_to_end(&mut out)?;
        Ok(out)
    }
}
