use crate::commands::{CmdMessage, CmdResult};
use crate::error::{JournalError, Result};
use crate::export::DocumentRenderer;
use crate::model::{save_timestamp, Entry, Subject};
use crate::session::SessionContext;
use crate::store::{store_uploads, BlobStore, NamedBlob};

/// Input collected by the UI for one new journal entry.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub title: String,
    pub date: String,
    pub description: String,
    pub material: String,
    pub questions: String,
    pub steps: String,
    pub goal: String,
    pub semester: String,
    pub images: Vec<NamedBlob>,
    pub documents: Vec<NamedBlob>,
}

pub fn run<B: BlobStore>(
    store: &B,
    session: &mut SessionContext,
    subject: Subject,
    draft: EntryDraft,
    renderer: &dyn DocumentRenderer,
) -> Result<CmdResult> {
    if draft.title.trim().is_empty() {
        return Err(JournalError::Api("entry title must not be empty".to_string()));
    }

    let username = session.username().to_string();
    let images_ns = subject.images_namespace(&username);
    let attachments_ns = subject.attachments_namespace(&username);
    let documents_ns = subject.documents_namespace(&username);

    let mut result = CmdResult::default();

    // Images feed the renderer; the entry itself only references documents.
    let image_report = store_uploads(store, &images_ns, &draft.images)?;
    for name in &image_report.skipped {
        result.add_message(CmdMessage::info(format!("Image already present: {}", name)));
    }

    let upload_report = store_uploads(store, &attachments_ns, &draft.documents)?;
    for name in &upload_report.skipped {
        result.add_message(CmdMessage::info(format!("File already present: {}", name)));
    }
    let mut attachments = upload_report.stored;

    let mut entry = Entry {
        title: draft.title.trim().to_string(),
        date: draft.date,
        description: draft.description,
        material: draft.material,
        questions: draft.questions,
        steps: draft.steps,
        goal: draft.goal,
        semester: draft.semester,
        saved_at: save_timestamp(),
        ..Default::default()
    };

    let rendered = renderer.render(&entry, &draft.images)?;
    store.ensure_namespace(&documents_ns)?;
    store.write(
        &documents_ns,
        &rendered.primary.filename,
        &rendered.primary.bytes,
    )?;
    entry.document = rendered.primary.filename;

    for extra in rendered.extras {
        store.write(&attachments_ns, &extra.filename, &extra.bytes)?;
        attachments.push(extra.filename);
    }
    entry.attachments = attachments;

    let dataset = session.dataset_mut(store, subject)?;
    dataset.append(entry.clone());
    dataset.save(store)?;

    result.add_message(CmdMessage::success(format!("Entry saved: {}", entry.title)));
    result.entries.push(entry);
    Ok(result)
}
