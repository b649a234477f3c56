use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Subject;
use crate::session::SessionContext;
use crate::store::BlobStore;

pub fn run<B: BlobStore>(store: &B, session: &mut SessionContext) -> Result<CmdResult> {
    let username = session.username().to_string();
    let mut result = CmdResult::default();
    let mut total = 0;

    for subject in Subject::ALL {
        let documents_ns = subject.documents_namespace(&username);
        let attachments_ns = subject.attachments_namespace(&username);

        let dataset = session.dataset_mut(store, subject)?;
        let dropped = dataset.reconcile(store, &documents_ns, &attachments_ns)?;
        if dropped > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - {}: removed {} record(s) referencing missing files.",
                subject.display_name(),
                dropped
            )));
        }
        total += dropped;
    }

    if total == 0 {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    } else {
        result
            .messages
            .insert(0, CmdMessage::warning("Inconsistencies found and fixed:"));
    }

    Ok(result)
}
