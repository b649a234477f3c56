//! # Command Layer
//!
//! The core business logic of the journal. Each command lives in its own
//! submodule and implements pure functions over the storage layer.
//!
//! ## Role and Responsibilities
//!
//! Commands:
//! - implement the actual logic for each operation,
//! - operate on [`crate::model::Entry`] and the session's datasets,
//! - return structured [`CmdResult`]s with entries, blobs and messages,
//! - are completely UI-agnostic.
//!
//! ## What Commands Do NOT Do
//!
//! - **Any terminal I/O**: no stdout, stderr or formatting concerns.
//! - **Argument parsing**: that's the CLI layer's job.
//! - **User interaction**: missing attachments come back as per-item
//!   warnings; the UI decides how to show them.
//!
//! ## Testing Strategy
//!
//! This is where the lion's share of testing lives. Command tests use
//! [`crate::store::MemBlobStore`] to avoid filesystem dependencies and
//! verify the `CmdResult` contents including error conditions.

use crate::model::Entry;
use crate::store::{NamedBlob, ResolvedAttachment};
use serde::Serialize;

pub mod doctor;
pub mod fetch;
pub mod list_entries;
pub mod save_entry;

pub use save_entry::EntryDraft;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Entries affected by or listed for the operation.
    pub entries: Vec<Entry>,
    /// Fetched primary documents.
    pub documents: Vec<NamedBlob>,
    /// Resolver output for fetched attachments.
    pub attachments: Vec<ResolvedAttachment>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_entries(mut self, entries: Vec<Entry>) -> Self {
        self.entries = entries;
        self
    }
}
