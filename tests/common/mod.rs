#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use quicknotes::note::{Draft, Note, NoteId};
use quicknotes::remote::{AuthApi, LoginResponse, NoteStore};
use quicknotes::session::{Session, User};
use quicknotes::{NoteError, Result};
use tempfile::TempDir;

/// Nothing listens here, so any request fails with a connection error.
pub const UNREACHABLE_API_URL: &str = "http://127.0.0.1:9/api";

/// Helper struct to run quicknotes commands against an isolated home directory
pub struct QuicknotesTest {
    pub temp_dir: TempDir,
    binary_path: String,
    api_url: String,
}

impl QuicknotesTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        QuicknotesTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_quicknotes").to_string(),
            api_url: UNREACHABLE_API_URL.to_string(),
        }
    }

    /// Point the binary at a running note service.
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.to_string();
        self
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("QUICKNOTES_HOME", self.temp_dir.path())
            .env("QUICKNOTES_API_URL", &self.api_url)
            .env_remove("QUICKNOTES_LOG")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to execute quicknotes command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.temp_dir.path().join("config.yaml"))
            .expect("Failed to read config file")
    }

    /// Store a session cookie that expires far in the future.
    pub fn write_session(&self, token: &str) {
        let cookie = serde_json::json!({
            "token": token,
            "user": { "_id": "u1", "name": "Ada" },
            "expires_at": "2099-01-01T00:00:00Z",
        });
        fs::write(
            self.temp_dir.path().join("session.json"),
            serde_json::to_string(&cookie).unwrap(),
        )
        .expect("Failed to write session file");
    }

    pub fn session_exists(&self) -> bool {
        self.temp_dir.path().join("session.json").exists()
    }
}

/// Serve canned `(status, body)` responses on a local port, one connection
/// each, from a background thread. Joining the handle yields the raw requests.
pub fn spawn_canned_server(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read test server address");

    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().expect("Failed to accept connection");
            requests.push(read_http_request(&mut socket));

            let reply = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(reply.as_bytes())
                .expect("Failed to write response");
        }
        requests
    });

    (format!("http://{addr}/api"), handle)
}

fn read_http_request(socket: &mut std::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).expect("Failed to read request");
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&data).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&data).to_string()
}

/// A failure the mock store returns on the next call of an operation.
#[derive(Debug, Clone)]
pub enum Failure {
    Server(u16, String),
    Network,
}

impl Failure {
    fn into_error(self) -> NoteError {
        match self {
            Failure::Server(status, message) => NoteError::Server { status, message },
            Failure::Network => NoteError::Network(
                "No response from server. Please check your connection.".to_string(),
            ),
        }
    }
}

#[derive(Default)]
struct MockState {
    notes: Vec<Note>,
    calls: Vec<String>,
    failures: HashMap<&'static str, Failure>,
    next_id: u32,
    /// When set, the server rewrites stored content the way a rich text
    /// backend would.
    wrap_content: bool,
}

/// In-memory note service recording every call it receives.
#[derive(Default)]
pub struct MockStore {
    state: Mutex<MockState>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(notes: Vec<Note>) -> Self {
        let store = Self::default();
        store.set_notes(notes);
        store
    }

    /// Replace the server-side collection without going through the API.
    pub fn set_notes(&self, notes: Vec<Note>) {
        self.state.lock().notes = notes;
    }

    pub fn server_notes(&self) -> Vec<Note> {
        self.state.lock().notes.clone()
    }

    pub fn fail_next(&self, operation: &'static str, failure: Failure) {
        self.state.lock().failures.insert(operation, failure);
    }

    pub fn wrap_content(&self) {
        self.state.lock().wrap_content = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.split(':').next() == Some(operation))
            .count()
    }

    fn begin(&self, operation: &'static str, detail: Option<&str>) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(match detail {
            Some(detail) => format!("{operation}:{detail}"),
            None => operation.to_string(),
        });
        match state.failures.remove(operation) {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }
}

pub fn note(id: &str, title: &str, content: &str) -> Note {
    Note {
        id: NoteId::new(id),
        title: title.to_string(),
        content: content.to_string(),
        color: "#ffffff".to_string(),
    }
}

pub fn user() -> User {
    User {
        id: Some("u1".to_string()),
        name: "Ada".to_string(),
        email: Some("ada@example.com".to_string()),
    }
}

impl NoteStore for MockStore {
    async fn list_notes(&self, _session: &Session) -> Result<Vec<Note>> {
        self.begin("list", None)?;
        Ok(self.state.lock().notes.clone())
    }

    async fn create_note(&self, session: &Session, draft: &Draft) -> Result<Note> {
        self.begin("create", session.user_id())?;

        let mut state = self.state.lock();
        state.next_id += 1;
        let content = if state.wrap_content {
            format!("<p>{}</p>", draft.content)
        } else {
            draft.content.clone()
        };
        let note = Note {
            id: NoteId::new(format!("n{}", state.next_id)),
            title: draft.title.clone(),
            content,
            color: draft.color.clone(),
        };
        state.notes.push(note.clone());
        Ok(note)
    }

    async fn update_note(&self, _session: &Session, id: &NoteId, draft: &Draft) -> Result<()> {
        self.begin("update", Some(id.as_str()))?;

        let mut state = self.state.lock();
        let wrap = state.wrap_content;
        let note = state
            .notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| NoteError::Server {
                status: 404,
                message: "Note not found".to_string(),
            })?;
        note.title = draft.title.clone();
        note.content = if wrap {
            format!("<p>{}</p>", draft.content)
        } else {
            draft.content.clone()
        };
        note.color = draft.color.clone();
        Ok(())
    }

    async fn delete_note(&self, _session: &Session, id: &NoteId) -> Result<()> {
        self.begin("delete", Some(id.as_str()))?;
        self.state.lock().notes.retain(|n| &n.id != id);
        Ok(())
    }
}

impl AuthApi for MockStore {
    async fn login(&self, email: &str, _password: &str) -> Result<LoginResponse> {
        self.begin("login", Some(email))?;
        Ok(LoginResponse {
            token: "token-1".to_string(),
            user: user(),
        })
    }

    async fn register(&self, _name: &str, email: &str, _password: &str) -> Result<()> {
        self.begin("register", Some(email))
    }

    async fn logout(&self, _session: &Session) -> Result<()> {
        self.begin("logout", None)
    }
}
