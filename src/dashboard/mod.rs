//! The dashboard controller: the single owner of the note collection and of
//! the open note form.
//!
//! Every change to the server goes through here. The controller keeps the
//! last known-good collection, applies server responses to it, and reports
//! every outcome as a [`Toast`]. Failures never leave it in a half-updated
//! state: on error the collection and the open form are exactly what they
//! were before the call.
//!
//! Reconciliation rules:
//!
//! - `refresh` replaces the collection wholesale.
//! - `create` appends the returned note, then refreshes so server-derived
//!   fields win.
//! - `update` never patches locally; it refreshes, since the server may
//!   normalize the rich text differently from what was typed.
//! - `delete` removes the note locally without a refresh.

pub mod modal;
pub mod toast;

use crate::error::{NoteError, Result};
use crate::form::SubmitIntent;
use crate::note::{Draft, Note, NoteId};
use crate::remote::{AuthApi, NoteStore};
use crate::session::{Session, SessionProvider};

pub use modal::ModalState;
pub use toast::{Toast, ToastLevel};

/// Where the front end should navigate after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Login,
}

pub struct DashboardController<P, S> {
    sessions: P,
    store: S,
    notes: Vec<Note>,
    modal: ModalState,
    toasts: Vec<Toast>,
    redirect: Option<Redirect>,
}

impl<P, S> DashboardController<P, S>
where
    P: SessionProvider,
    S: NoteStore,
{
    pub fn new(sessions: P, store: S) -> Self {
        Self {
            sessions,
            store,
            notes: Vec::new(),
            modal: ModalState::Closed,
            toasts: Vec::new(),
            redirect: None,
        }
    }

    /// The collection as of the last successful sync.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.modal.draft()
    }

    /// Mutable access to the open form's draft, for input handling.
    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        self.modal.draft_mut()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Drain the pending notifications, oldest first.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    pub fn take_redirect(&mut self) -> Option<Redirect> {
        self.redirect.take()
    }

    /// Gate the dashboard on a session, then load the notes.
    pub async fn initialize(&mut self) -> Result<()> {
        self.session()?;
        self.refresh().await
    }

    /// Replace the collection with the server's current list.
    pub async fn refresh(&mut self) -> Result<()> {
        let session = self.session()?;

        let result = self.store.list_notes(&session).await;
        match result {
            Ok(notes) => {
                tracing::debug!(count = notes.len(), "collection refreshed");
                self.notes = notes;
                Ok(())
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Persist a new note.
    ///
    /// On success the create form (if open) is closed and a refresh follows.
    /// A failing follow-up refresh is reported but does not fail the create.
    pub async fn create(&mut self, draft: Draft) -> Result<Note> {
        let draft = draft.validated().map_err(|e| self.report(e))?;
        let session = self.session()?;

        let note = match self.store.create_note(&session, &draft).await {
            Ok(note) => note,
            Err(e) => return Err(self.report(e)),
        };

        tracing::debug!(id = %note.id, "note created");
        self.notes.push(note.clone());
        if matches!(self.modal, ModalState::Creating(_)) {
            self.modal.close();
        }
        self.toasts.push(Toast::success("Note added successfully"));

        self.follow_up_refresh().await;
        Ok(note)
    }

    /// Persist edits to an existing note, then refresh.
    ///
    /// The draft is checked before the target, and neither check touches the
    /// network. On any failure the edit form stays open.
    pub async fn update(&mut self, id: Option<NoteId>, draft: Draft) -> Result<()> {
        let draft = draft.validated().map_err(|e| self.report(e))?;
        let id = id
            .filter(|id| !id.as_str().trim().is_empty())
            .ok_or_else(|| self.report(NoteError::MissingTarget))?;
        let session = self.session()?;

        if let Err(e) = self.store.update_note(&session, &id, &draft).await {
            return Err(self.report(e));
        }

        tracing::debug!(%id, "note updated");
        if matches!(self.modal, ModalState::Editing { .. }) {
            self.modal.close();
        }
        self.toasts.push(Toast::success("Note updated successfully"));

        self.follow_up_refresh().await;
        Ok(())
    }

    /// Delete a note and drop it from the collection without re-fetching.
    pub async fn delete(&mut self, id: &NoteId) -> Result<()> {
        if id.as_str().trim().is_empty() {
            return Err(self.report(NoteError::MissingTarget));
        }
        let session = self.session()?;

        if let Err(e) = self.store.delete_note(&session, id).await {
            return Err(self.report(e));
        }

        tracing::debug!(%id, "note deleted");
        self.notes.retain(|n| &n.id != id);
        self.toasts.push(Toast::success("Note deleted"));
        Ok(())
    }

    pub fn open_create_modal(&mut self) -> Result<()> {
        self.modal.open_create()
    }

    pub fn open_edit_modal(&mut self, note: Note) -> Result<()> {
        self.modal.open_edit(note)
    }

    /// Open the edit form for a note in the current collection.
    pub fn open_edit_modal_by_id(&mut self, id: &NoteId) -> Result<()> {
        let note = self
            .note(id)
            .cloned()
            .ok_or_else(|| NoteError::NoteNotFound(id.to_string()))?;
        self.modal.open_edit(note)
    }

    /// Close the open form, discarding its draft.
    pub fn close_modal(&mut self) {
        self.modal.close();
    }

    /// Submit whichever form is open.
    pub async fn submit(&mut self) -> Result<()> {
        match self.modal.clone() {
            ModalState::Closed => Err(NoteError::ModalClosed),
            ModalState::Creating(draft) => self.create(draft).await.map(|_| ()),
            ModalState::Editing { note, draft } => self.update(Some(note.id), draft).await,
        }
    }

    /// Act on an intent emitted by a [`NoteForm`](crate::form::NoteForm) or
    /// [`NoteEditor`](crate::form::NoteEditor).
    pub async fn apply(&mut self, intent: SubmitIntent) -> Result<()> {
        match intent {
            SubmitIntent::Add(draft) => self.create(draft).await.map(|_| ()),
            SubmitIntent::Update { id, draft } => self.update(id, draft).await,
        }
    }

    /// Current session, or `Unauthenticated` plus a redirect to login.
    fn session(&mut self) -> Result<Session> {
        match self.sessions.current() {
            Ok(Some(session)) => Ok(session),
            Ok(None) => {
                self.redirect = Some(Redirect::Login);
                self.toasts
                    .push(Toast::error("Please login to access the dashboard"));
                Err(NoteError::Unauthenticated)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    async fn follow_up_refresh(&mut self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!("refresh after successful write failed: {e}");
        }
    }

    /// Surface an error as a toast and hand it back for propagation.
    fn report(&mut self, error: NoteError) -> NoteError {
        let message = error.to_string();
        if error.is_remote() {
            tracing::warn!("note service call failed: {message}");
        }
        if error.is_unauthorized() {
            self.redirect = Some(Redirect::Login);
        }
        self.toasts.push(Toast::error(message));
        error
    }
}

impl<P, S> DashboardController<P, S>
where
    P: SessionProvider,
    S: NoteStore + AuthApi,
{
    /// End the session on the server, then locally.
    ///
    /// When the server call fails the local session is kept.
    pub async fn logout(&mut self) -> Result<()> {
        let session = self.session()?;

        if let Err(e) = self.store.logout(&session).await {
            return Err(self.report(e));
        }

        self.sessions.clear()?;
        self.notes.clear();
        self.modal.close();
        self.redirect = Some(Redirect::Login);
        self.toasts.push(Toast::success("Logged out successfully"));
        Ok(())
    }
}
