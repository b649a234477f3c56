//! # API Facade
//!
//! The API layer is a thin facade over the command layer. It is the single
//! entry point for all journal operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! - **Dispatches** to the appropriate command function.
//! - **Owns the session lifecycle**: login/register go through the
//!   credential store, commands require an active session.
//! - **Returns structured types** (`Result<CmdResult>`), never strings.
//!
//! ## Generic Over BlobStore
//!
//! `JournalApi<B: BlobStore>` is generic over the storage backend:
//! - Production: `JournalApi<FsBlobStore>`
//! - Testing: `JournalApi<MemBlobStore>`
//!
//! This enables testing the whole stack without touching the filesystem.
//!
//! ## External Authentication
//!
//! The journal is keyed on a username but does not insist on doing the
//! authentication itself: [`JournalApi::open_session`] lets an outer
//! authentication collaborator vouch for a name, while [`JournalApi::login`]
//! verifies against the built-in credential store.

use crate::auth::CredentialStore;
use crate::commands::{self, CmdMessage, CmdResult, EntryDraft};
use crate::config::JournalConfig;
use crate::error::{JournalError, Result};
use crate::export::DocumentRenderer;
use crate::model::Subject;
use crate::session::SessionContext;
use crate::store::{AttachmentResolver, BlobStore};

pub struct JournalApi<B: BlobStore> {
    store: B,
    credentials: CredentialStore,
    resolver: AttachmentResolver,
    session: Option<SessionContext>,
}

impl<B: BlobStore> JournalApi<B> {
    pub fn new(store: B, config: &JournalConfig) -> Self {
        Self {
            credentials: CredentialStore::new(config.credentials_file.clone()),
            resolver: AttachmentResolver::new(config.retry_policy()),
            store,
            session: None,
        }
    }

    pub fn store(&self) -> &B {
        &self.store
    }

    pub fn session(&self) -> Option<&SessionContext> {
        self.session.as_ref()
    }

    pub fn register(
        &self,
        username: &str,
        display_name: &str,
        password: &str,
    ) -> Result<CmdResult> {
        self.credentials
            .register(&self.store, username, display_name, password)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "User '{}' registered.",
            username
        )));
        Ok(result)
    }

    /// Verifies the password and opens a session on success.
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        if self.credentials.verify(&self.store, username, password)? {
            self.session = Some(SessionContext::new(username));
            Ok(())
        } else {
            Err(JournalError::Auth(
                "username or password is incorrect".to_string(),
            ))
        }
    }

    /// Opens a session for an already-authenticated user. The caller — an
    /// outer authentication collaborator — vouches for the name.
    pub fn open_session(&mut self, username: &str) {
        self.session = Some(SessionContext::new(username));
    }

    pub fn logout(&mut self) {
        self.session = None;
    }

    pub fn save_entry(
        &mut self,
        subject: Subject,
        draft: EntryDraft,
        renderer: &dyn DocumentRenderer,
    ) -> Result<CmdResult> {
        let JournalApi { store, session, .. } = self;
        let session = active(session)?;
        commands::save_entry::run(store, session, subject, draft, renderer)
    }

    pub fn entries(&mut self, subject: Subject, search: Option<&str>) -> Result<CmdResult> {
        let JournalApi { store, session, .. } = self;
        let session = active(session)?;
        commands::list_entries::run(store, session, subject, search)
    }

    pub fn fetch(&mut self, subject: Subject, index: usize) -> Result<CmdResult> {
        let JournalApi {
            store,
            session,
            resolver,
            ..
        } = self;
        let session = active(session)?;
        commands::fetch::run(store, session, subject, index, resolver)
    }

    pub fn doctor(&mut self) -> Result<CmdResult> {
        let JournalApi { store, session, .. } = self;
        let session = active(session)?;
        commands::doctor::run(store, session)
    }
}

fn active(session: &mut Option<SessionContext>) -> Result<&mut SessionContext> {
    session
        .as_mut()
        .ok_or_else(|| JournalError::Auth("no active session".to_string()))
}
