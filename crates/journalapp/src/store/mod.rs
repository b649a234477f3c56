//! # Storage Layer
//!
//! This module defines the storage abstraction for the journal. The
//! [`BlobStore`] trait allows the application to work with different backends.
//!
//! ## Record/Blob Split
//!
//! The journal maintains a split model per (user, subject):
//! 1. **Records**: one CSV dataset listing the saved entries.
//! 2. **Blobs**: the documents, images and attachments the records reference.
//!
//! Blobs are the truth for attachment existence. The dataset is assumed to be
//! *potentially stale* and self-heals on read.
//!
//! ## Reconciliation Logic
//!
//! [`Dataset::reconcile`] runs before listing entries:
//!
//! 1. Entry references a primary document that no longer exists → drop entry.
//! 2. Entry references an attachment that no longer exists → drop entry.
//! 3. Anything dropped → persist the reduced dataset, report the count.
//!
//! Reconciliation is one-directional: blobs referenced by no record are left
//! in place and never garbage-collected.
//!
//! ## Eventual Consistency
//!
//! The backend is a shared remote resource; a `write` followed by a `read`
//! from another logical request may still observe the old state. Reads that
//! are expected to succeed go through [`AttachmentResolver`], which applies a
//! bounded [`crate::retry::RetryPolicy`] before declaring a blob missing.
//! No operation polls unboundedly.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBlobStore`]: production backend over a root folder (a
//!   local data directory or a mounted remote share).
//! - [`mem_backend::MemBlobStore`]: for testing logic without filesystem I/O,
//!   including simulated write failures and replication lag.
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//! ├── credentials.json                 # credential blob (see crate::auth)
//! ├── data/
//! │   └── data_chemie_<user>.csv       # one dataset per (user, subject)
//! ├── word_chemie/<user>/              # generated documents
//! ├── bilder_chemie/<user>/            # uploaded images
//! └── anhang_chemie/<user>/            # uploaded attachments + extras
//! ```

use crate::error::Result;

pub mod dataset;
pub mod fs_backend;
pub mod mem_backend;
pub mod resolver;
pub mod writer;

pub use dataset::Dataset;
pub use fs_backend::FsBlobStore;
pub use mem_backend::MemBlobStore;
pub use resolver::{AttachmentResolver, Resolution, ResolvedAttachment};
pub use writer::{store_uploads, StoredUploads};

/// A named byte sequence travelling to or from the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBlob {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl NamedBlob {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Abstract interface for durable byte storage per logical namespace.
///
/// All operations are remote I/O against a shared resource; implementations
/// must not assume read-after-write consistency across requests.
pub trait BlobStore {
    /// Idempotent create-if-absent for a namespace.
    fn ensure_namespace(&self, namespace: &str) -> Result<()>;

    /// Fast existence check, no retry semantics.
    fn exists(&self, namespace: &str, name: &str) -> Result<bool>;

    /// Non-recursive listing of blob names within a namespace.
    /// A namespace that was never created lists as empty.
    fn list(&self, namespace: &str) -> Result<Vec<String>>;

    /// Reads a blob, failing with `BlobNotFound` if absent.
    fn read(&self, namespace: &str, name: &str) -> Result<Vec<u8>>;

    /// Creates or overwrites a blob. Must be atomic for file-backed stores
    /// and safe to call concurrently for distinct names.
    fn write(&self, namespace: &str, name: &str, bytes: &[u8]) -> Result<()>;

    /// Deletes a blob. An already-missing blob is not an error; remote
    /// stores may race deletions.
    fn delete(&self, namespace: &str, name: &str) -> Result<()>;
}
