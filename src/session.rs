//! Session handling.
//!
//! The controller never reads credentials from ambient state; it is handed a
//! [`SessionProvider`]. The CLI uses [`CookieJar`], which keeps the bearer
//! token in a small JSON file that expires seven days after login.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use jiff::{SignedDuration, Timestamp};
use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};

use crate::error::{NoteError, Result};

/// How long a login stays valid.
pub const SESSION_LIFETIME_DAYS: i64 = 7;

/// The logged-in user as reported by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserRecord")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Wire form of a user; `_id` and `id` may both be present.
#[derive(Deserialize)]
struct UserRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.mongo_id.or(record.id),
            name: record.name,
            email: record.email,
        }
    }
}

/// An authenticated session: the bearer token plus whatever we know about
/// the user it belongs to.
pub struct Session {
    token: SecretBox<String>,
    user: Option<User>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: Option<User>) -> Self {
        Self {
            token: SecretBox::new(Box::new(token.into())),
            user,
        }
    }

    /// The raw bearer token, for the `Authorization` header only.
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.id.as_deref())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Source of the current session.
pub trait SessionProvider: Send + Sync {
    /// The current session, or `None` when nobody is logged in or the
    /// session has expired.
    fn current(&self) -> Result<Option<Session>>;

    /// Forget the session (logout).
    fn clear(&self) -> Result<()>;
}

/// On-disk form of the session cookie.
#[derive(Serialize, Deserialize)]
struct StoredCookie {
    token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
    /// RFC 3339 timestamp
    expires_at: String,
}

/// File-backed session store.
#[derive(Debug, Clone)]
pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a fresh login, valid for [`SESSION_LIFETIME_DAYS`].
    pub fn save(&self, session: &Session) -> Result<()> {
        let expires_at = Timestamp::now()
            .checked_add(SignedDuration::from_hours(SESSION_LIFETIME_DAYS * 24))
            .map_err(|e| NoteError::Config(format!("cannot compute session expiry: {e}")))?;
        self.save_until(session, expires_at)
    }

    pub fn save_until(&self, session: &Session, expires_at: Timestamp) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let cookie = StoredCookie {
            token: session.token().to_string(),
            user: session.user.clone(),
            expires_at: expires_at.to_string(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&cookie)?)?;
        restrict_permissions(&self.path)?;

        tracing::debug!(path = %self.path.display(), %expires_at, "session saved");
        Ok(())
    }
}

impl SessionProvider for CookieJar {
    fn current(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let cookie: StoredCookie = match serde_json::from_str(&content) {
            Ok(cookie) => cookie,
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {}: {e}", self.path.display());
                return Ok(None);
            }
        };

        let expired = match cookie.expires_at.parse::<Timestamp>() {
            Ok(expires_at) => expires_at <= Timestamp::now(),
            Err(e) => {
                tracing::warn!("Session file has invalid expiry '{}': {e}", cookie.expires_at);
                true
            }
        };
        if expired {
            tracing::debug!("session expired, removing {}", self.path.display());
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(Session::new(cookie.token, cookie.user)))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// In-memory session, for embedding and tests.
#[derive(Default)]
pub struct StaticSession {
    inner: Mutex<Option<(String, Option<User>)>>,
}

impl StaticSession {
    pub fn logged_in(token: impl Into<String>, user: Option<User>) -> Self {
        Self {
            inner: Mutex::new(Some((token.into(), user))),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl SessionProvider for StaticSession {
    fn current(&self) -> Result<Option<Session>> {
        Ok(self
            .inner
            .lock()
            .as_ref()
            .map(|(token, user)| Session::new(token.clone(), user.clone())))
    }

    fn clear(&self) -> Result<()> {
        *self.inner.lock() = None;
        Ok(())
    }
}
