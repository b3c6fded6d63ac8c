//! Cloud client abstractions for remote storage media.
//!
//! This module provides **generic traits** for the remote media a transfer can read from or
//! write to, in a provider-agnostic way:
//!
//! - [`ObjectIO`] - Object storage (S3 and S3-compatible services)
//! - [`TableIO`] - Relational tables exchanged as `COPY ... WITH CSV HEADER` payloads
//!
//! Each trait comes with:
//!
//! - **Synchronous interface** - All operations are blocking; implementations over async SDKs
//!   drive their own runtime internally
//! - **Fake implementations** - In-memory [`FakeObjectIO`] and [`FakeTableIO`] for tests
//! - **A real client** where one is bundled: [`s3::S3ObjectIO`] (feature `s3`)
//!
//! ## Credentials
//!
//! Clients receive credentials at construction ([`CloudCredentials`]) together with endpoint
//! settings ([`CloudConfig`]). Nothing in the transfer path takes credentials as a parameter.
//!
//! ```
//! use table_transfer::io::cloud::*;
//! use std::sync::Arc;
//!
//! # fn main() -> CloudResult<()> {
//! let storage = FakeObjectIO::new().with_credentials(Arc::new(FakeCredentials::new("tester")));
//! storage.put_object("bucket", "people.csv", b"id,name\n1,alice\n")?;
//! assert!(storage.object_exists("bucket", "people.csv")?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`CloudResult<T>`] where the error is [`CloudIOError`], categorized
//! by [`ErrorKind`]. [`TransferError`](crate::TransferError) converts from it, folding
//! `Authentication`/`Authorization` into `AccessDenied`.

pub mod fake;
pub mod helpers;
#[cfg(feature = "s3")]
pub mod s3;
pub mod traits;

pub use fake::*;
pub use traits::*;
