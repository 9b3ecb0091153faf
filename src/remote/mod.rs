//! Remote note service.
//!
//! The controller talks to the service through [`NoteStore`] and the login
//! flows through [`AuthApi`]. [`RestClient`] implements both over HTTP.

pub mod error;
pub mod rest;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::note::{Draft, Note, NoteId};
use crate::session::{Session, User};

pub use error::ApiError;
pub use rest::RestClient;

/// Persistence for a user's notes.
pub trait NoteStore: Send + Sync {
    /// Fetch every note owned by the session's user.
    fn list_notes(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<Vec<Note>>> + Send;

    /// Create a note and return it with its server-assigned id.
    fn create_note(
        &self,
        session: &Session,
        draft: &Draft,
    ) -> impl std::future::Future<Output = Result<Note>> + Send;

    /// Overwrite title, content and color of an existing note.
    fn update_note(
        &self,
        session: &Session,
        id: &NoteId,
        draft: &Draft,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn delete_note(
        &self,
        session: &Session,
        id: &NoteId,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Account endpoints.
pub trait AuthApi: Send + Sync {
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<LoginResponse>> + Send;

    fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn logout(&self, session: &Session) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Body of `POST /notes/create`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub color: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

/// Body of `PUT /notes/update`
#[derive(Debug, Serialize)]
pub struct UpdateNoteRequest<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub color: &'a str,
}

/// `POST /notes/create` answers with `{note: ...}`; a bare note is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CreateNoteResponse {
    Envelope { note: Note },
    Bare(Note),
}

impl CreateNoteResponse {
    pub(crate) fn into_note(self) -> Note {
        match self {
            CreateNoteResponse::Envelope { note } | CreateNoteResponse::Bare(note) => note,
        }
    }
}

/// `GET /notes/get-all-by-uid` answers with an array; `{notes: [...]}` is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListNotesResponse {
    Bare(Vec<Note>),
    Envelope { notes: Vec<Note> },
}

impl ListNotesResponse {
    pub(crate) fn into_notes(self) -> Vec<Note> {
        match self {
            ListNotesResponse::Bare(notes) | ListNotesResponse::Envelope { notes } => notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login
#[derive(Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

impl LoginResponse {
    pub fn into_session(self) -> Session {
        Session::new(self.token, Some(self.user))
    }
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}
