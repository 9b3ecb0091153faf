use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteError {
    #[error("not logged in; run `quicknotes login` first")]
    Unauthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("note ID is missing")]
    MissingTarget,

    #[error("note '{0}' not found")]
    NoteNotFound(String),

    #[error("another note form is already open")]
    ModalBusy,

    #[error("no note form is open")]
    ModalClosed,

    // Remote errors
    #[error("{0}")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NoteError {
    /// Whether the error came from talking to the note service, as opposed
    /// to being rejected locally before any request was made.
    pub fn is_remote(&self) -> bool {
        matches!(self, NoteError::Network(_) | NoteError::Server { .. })
    }

    /// The server rejected the session (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, NoteError::Server { status: 401, .. })
    }
}

pub type Result<T> = std::result::Result<T, NoteError>;
