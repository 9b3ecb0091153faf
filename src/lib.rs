pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod form;
pub mod logging;
pub mod note;
pub mod remote;
pub mod sanitize;
pub mod session;
pub mod utils;

pub use config::Config;
pub use dashboard::{DashboardController, ModalState, Redirect, Toast, ToastLevel};
pub use error::{NoteError, Result};
pub use form::{NoteEditor, NoteForm, SubmitIntent};
pub use note::{DEFAULT_COLOR, Draft, Note, NoteId, PALETTE};
pub use remote::{ApiError, AuthApi, LoginResponse, NoteStore, RestClient};
pub use session::{CookieJar, Session, SessionProvider, StaticSession, User};
