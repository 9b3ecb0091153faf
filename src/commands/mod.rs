mod auth;
mod config;
mod notes;

pub use auth::{cmd_login, cmd_logout, cmd_signup};
pub use config::{cmd_config_path, cmd_config_set, cmd_config_show};
pub use notes::{NoteEdits, cmd_add, cmd_colors, cmd_edit, cmd_ls, cmd_rm};

use crate::config::Config;
use crate::dashboard::{DashboardController, Toast};
use crate::error::{NoteError, Result};
use crate::remote::RestClient;
use crate::session::CookieJar;

/// Controller wired to the on-disk session and the configured note service.
pub type CliDashboard = DashboardController<CookieJar, RestClient>;

/// Output of a command: a JSON value for `--json`, and optionally a
/// human-readable rendering. Without text, the JSON is printed either way;
/// an empty text prints nothing in human mode.
pub struct CommandOutput {
    json: serde_json::Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: serde_json::Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, json: bool) -> Result<()> {
        match self.text {
            Some(text) if !json => {
                if !text.is_empty() {
                    print!("{text}");
                    if !text.ends_with('\n') {
                        println!();
                    }
                }
            }
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}

pub(crate) fn open_dashboard() -> Result<CliDashboard> {
    let config = Config::load()?;
    let client = RestClient::from_config(&config)?;
    let jar = CookieJar::new(Config::session_path()?);
    Ok(DashboardController::new(jar, client))
}

/// Toasts worth printing after a command: everything except the error
/// toast that became the command's returned error, which `main` prints.
pub(crate) fn pending_toasts(toasts: Vec<Toast>, error: Option<&NoteError>) -> Vec<Toast> {
    let returned = error.map(|e| e.to_string());
    let mut skipped = false;

    toasts
        .into_iter()
        .rev()
        .filter(|toast| {
            let is_returned =
                !skipped && toast.is_error() && returned.as_deref() == Some(toast.message.as_str());
            skipped |= is_returned;
            !is_returned
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// Print notifications to stderr. In JSON mode stdout stays machine-readable
/// and toasts are not printed.
pub(crate) fn print_toasts(toasts: Vec<Toast>, error: Option<&NoteError>, json: bool) {
    if json {
        return;
    }
    for toast in pending_toasts(toasts, error) {
        eprintln!("{}", toast.render());
    }
}
