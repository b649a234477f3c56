use super::{BlobStore, NamedBlob};
use crate::error::Result;
use crate::model::{generated_blob_name, sanitize_filename};

/// Outcome of storing a batch of uploads.
#[derive(Debug, Default)]
pub struct StoredUploads {
    /// Generated blob names, in upload order.
    pub stored: Vec<String>,
    /// Sanitized names that were skipped because a blob with that original
    /// name already exists in the namespace.
    pub skipped: Vec<String>,
}

/// Stores uploaded files under generated collision-resistant names.
///
/// The symmetric counterpart of [`super::AttachmentResolver`]: uploads whose
/// sanitized original name already appears at the end of an existing blob
/// name are skipped, so re-submitting a form does not duplicate files.
pub fn store_uploads<B: BlobStore>(
    store: &B,
    namespace: &str,
    uploads: &[NamedBlob],
) -> Result<StoredUploads> {
    store.ensure_namespace(namespace)?;
    let existing = store.list(namespace)?;

    let mut report = StoredUploads::default();
    for upload in uploads {
        let clean = sanitize_filename(&upload.name);
        if existing.iter().any(|name| name.ends_with(clean.as_str())) {
            tracing::debug!(name = %clean, "upload already present, skipping");
            report.skipped.push(clean);
            continue;
        }
        let blob_name = generated_blob_name(&upload.name);
        store.write(namespace, &blob_name, &upload.bytes)?;
        report.stored.push(blob_name);
    }
    Ok(report)
}
