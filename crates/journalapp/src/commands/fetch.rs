use crate::commands::{CmdMessage, CmdResult};
use crate::error::{JournalError, Result};
use crate::model::Subject;
use crate::session::SessionContext;
use crate::store::{AttachmentResolver, BlobStore, NamedBlob};

/// Fetches one entry's primary document and attachment bytes for download.
///
/// `index` is the zero-based position within the subject's dataset. Missing
/// files come back as per-item warnings; only hard I/O errors fail the call.
pub fn run<B: BlobStore>(
    store: &B,
    session: &mut SessionContext,
    subject: Subject,
    index: usize,
    resolver: &AttachmentResolver,
) -> Result<CmdResult> {
    let username = session.username().to_string();
    let dataset = session.dataset_mut(store, subject)?;
    let entry = dataset
        .entries()
        .get(index)
        .ok_or_else(|| JournalError::Api(format!("entry index out of range: {}", index)))?
        .clone();

    let mut result = CmdResult::default();

    if !entry.document.is_empty() {
        let documents_ns = subject.documents_namespace(&username);
        match store.read(&documents_ns, &entry.document) {
            Ok(bytes) => result
                .documents
                .push(NamedBlob::new(entry.document.clone(), bytes)),
            Err(err) if err.is_not_found() => {
                result.add_message(CmdMessage::warning(format!(
                    "Document missing: {}",
                    entry.document
                )));
            }
            Err(err) => return Err(err),
        }
    }

    let attachments_ns = subject.attachments_namespace(&username);
    let resolved = resolver.resolve_all(store, &attachments_ns, &entry.attachments)?;
    for attachment in &resolved {
        if attachment.is_missing() {
            result.add_message(CmdMessage::warning(format!(
                "Attachment not found: {}",
                attachment.name
            )));
        }
    }

    result.attachments = resolved;
    result.entries.push(entry);
    Ok(result)
}
