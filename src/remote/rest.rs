//! HTTP client for the note service REST API.
//!
//! The bearer token goes through `RequestBuilder::bearer_auth`, which marks
//! the header as sensitive so it never shows up in reqwest's debug logging.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{NoteError, Result};
use crate::note::{Draft, Note, NoteId};
use crate::session::Session;

use super::error::ApiError;
use super::{
    AuthApi, CreateNoteRequest, CreateNoteResponse, ListNotesResponse, LoginRequest,
    LoginResponse, NoteStore, RegisterRequest, UpdateNoteRequest,
};

/// Note service client
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: Url,
}

impl RestClient {
    /// Create a client for the API rooted at `base_url` (e.g.
    /// `http://localhost:3000/api`), using the transport's default timeouts.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::build(base_url, None)
    }

    /// Create a client from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::build(&config.api_url(), config.request_timeout())
    }

    fn build(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(NoteError::Config(format!(
                "API URL '{base_url}' cannot be used as a base URL"
            )));
        }
        // Keep the last path segment when joining endpoint paths.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| NoteError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path relative to the API root.
    pub fn endpoint(&self, path: &str, id: Option<&NoteId>) -> Result<Url> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        if let Some(id) = id {
            url.query_pairs_mut().append_pair("id", id.as_str());
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, session: Option<&Session>) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match session {
            Some(session) => builder.bearer_auth(session.token()),
            None => builder,
        }
    }

    /// Send a request and turn any non-success status into an error.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(ApiError::transport)?;
        let status = response.status();
        tracing::debug!(url = %response.url(), %status, "note service response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_response(status, &body);
        tracing::warn!(
            %status,
            transient = error.is_transient(),
            "note service error: {}",
            error.message
        );
        Err(error.into())
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(ApiError::transport)?;
        serde_json::from_str(&body).map_err(|e| NoteError::Server {
            status: status.as_u16(),
            message: format!("Unexpected response from server: {e}"),
        })
    }
}

impl NoteStore for RestClient {
    async fn list_notes(&self, session: &Session) -> Result<Vec<Note>> {
        let url = self.endpoint("notes/get-all-by-uid", None)?;
        let response = self.send(self.request(Method::GET, url, Some(session))).await?;
        let notes = Self::read_json::<ListNotesResponse>(response).await?.into_notes();
        tracing::debug!(count = notes.len(), "fetched notes");
        Ok(notes)
    }

    async fn create_note(&self, session: &Session, draft: &Draft) -> Result<Note> {
        let url = self.endpoint("notes/create", None)?;
        let body = CreateNoteRequest {
            title: &draft.title,
            content: &draft.content,
            color: &draft.color,
            user_id: session.user_id(),
        };
        let request = self.request(Method::POST, url, Some(session)).json(&body);
        let response = self.send(request).await?;
        let note = Self::read_json::<CreateNoteResponse>(response)
            .await?
            .into_note();
        tracing::debug!(id = %note.id, "created note");
        Ok(note)
    }

    async fn update_note(&self, session: &Session, id: &NoteId, draft: &Draft) -> Result<()> {
        let url = self.endpoint("notes/update", Some(id))?;
        let body = UpdateNoteRequest {
            title: &draft.title,
            content: &draft.content,
            color: &draft.color,
        };
        // The response body is not relied upon; the caller re-fetches.
        self.send(self.request(Method::PUT, url, Some(session)).json(&body))
            .await?;
        Ok(())
    }

    async fn delete_note(&self, session: &Session, id: &NoteId) -> Result<()> {
        let url = self.endpoint("notes/delete", Some(id))?;
        self.send(self.request(Method::DELETE, url, Some(session)))
            .await?;
        Ok(())
    }
}

impl AuthApi for RestClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = self.endpoint("users/login", None)?;
        let request = self
            .request(Method::POST, url, None)
            .json(&LoginRequest { email, password });
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
        let url = self.endpoint("users/register", None)?;
        let request = self
            .request(Method::POST, url, None)
            .json(&RegisterRequest {
                name,
                email,
                password,
            });
        self.send(request).await?;
        Ok(())
    }

    async fn logout(&self, session: &Session) -> Result<()> {
        let url = self.endpoint("users/logout", None)?;
        let request = self
            .request(Method::POST, url, Some(session))
            .json(&serde_json::json!({}));
        self.send(request).await?;
        Ok(())
    }
}
