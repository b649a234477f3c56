use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Entry, Subject};
use crate::session::SessionContext;
use crate::store::BlobStore;

pub fn run<B: BlobStore>(
    store: &B,
    session: &mut SessionContext,
    subject: Subject,
    search: Option<&str>,
) -> Result<CmdResult> {
    let username = session.username().to_string();
    let documents_ns = subject.documents_namespace(&username);
    let attachments_ns = subject.attachments_namespace(&username);

    let dataset = session.dataset_mut(store, subject)?;
    let dropped = dataset.reconcile(store, &documents_ns, &attachments_ns)?;

    let mut result = CmdResult::default();
    if dropped > 0 {
        result.add_message(CmdMessage::warning(format!(
            "Removed {} record(s) whose files are no longer in storage.",
            dropped
        )));
    }

    let entries: Vec<Entry> = match search {
        Some(term) if !term.trim().is_empty() => dataset
            .entries()
            .iter()
            .filter(|entry| entry.matches_search(term.trim()))
            .cloned()
            .collect(),
        _ => dataset.entries().to_vec(),
    };

    if entries.is_empty() {
        result.add_message(CmdMessage::info("No entries found."));
    }

    Ok(result.with_entries(entries))
}
