#[path = "common/mod.rs"]
mod common;

use common::{UNREACHABLE_API_URL, user};
use quicknotes::dashboard::DashboardController;
use quicknotes::note::{Draft, NoteId};
use quicknotes::remote::{AuthApi, NoteStore, RestClient};
use quicknotes::session::{Session, StaticSession};
use quicknotes::NoteError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// ============================================================================
// A canned HTTP server: one response per connection, in order
// ============================================================================

struct CannedServer {
    base_url: String,
    handle: JoinHandle<Vec<String>>,
}

impl CannedServer {
    async fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);

                let reply = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            requests
        });

        CannedServer {
            base_url: format!("http://{addr}/api"),
            handle,
        }
    }

    fn client(&self) -> RestClient {
        RestClient::new(&self.base_url).unwrap()
    }

    /// Every request the server handled, once all responses have been sent.
    async fn requests(self) -> Vec<String> {
        self.handle.await.unwrap()
    }
}

/// Read one request. The request line and headers are lowercased so header
/// checks are case-insensitive; the body is kept as sent.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
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

    let text = String::from_utf8_lossy(&data).to_string();
    match text.split_once("\r\n\r\n") {
        Some((head, body)) => format!("{}\r\n\r\n{body}", head.to_lowercase()),
        None => text.to_lowercase(),
    }
}

fn body_of(request: &str) -> serde_json::Value {
    let (_, body) = request.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

fn session() -> Session {
    Session::new("tok-123", Some(user()))
}

// ============================================================================
// Note endpoints
// ============================================================================

#[tokio::test]
async fn test_list_notes_sends_bearer_token() {
    let server = CannedServer::start(vec![(
        200,
        r##"[{"_id":"a","title":"Groceries","content":"<p>Milk</p>","color":"#FFF475"},{"_id":"b","title":"Ideas","content":"x","color":null}]"##,
    )])
    .await;

    let notes = server.client().list_notes(&session()).await.unwrap();

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id, NoteId::new("a"));
    assert_eq!(notes[1].color, "#ffffff");

    let requests = server.requests().await;
    assert!(requests[0].starts_with("get /api/notes/get-all-by-uid "));
    assert!(requests[0].contains("authorization: bearer tok-123"));
}

#[tokio::test]
async fn test_list_notes_accepts_both_id_keys() {
    let server = CannedServer::start(vec![(
        200,
        r#"[{"_id":"a","id":"a","title":"Groceries","content":"Milk"},{"_id":"b","title":"Ideas","content":"x"}]"#,
    )])
    .await;

    let notes = server.client().list_notes(&session()).await.unwrap();
    let ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);

    server.requests().await;
}

#[tokio::test]
async fn test_create_note_posts_body_with_user_id() {
    let server = CannedServer::start(vec![(
        201,
        r##"{"note":{"_id":"n1","title":"Groceries","content":"Milk, eggs","color":"#fff475"}}"##,
    )])
    .await;

    let draft = Draft::new("Groceries", "Milk, eggs", "#fff475");
    let note = server.client().create_note(&session(), &draft).await.unwrap();
    assert_eq!(note.id, NoteId::new("n1"));

    let requests = server.requests().await;
    assert!(requests[0].starts_with("post /api/notes/create "));
    let body = body_of(&requests[0]);
    assert_eq!(body["userId"], "u1");
    assert_eq!(body["title"], "Groceries");
    assert_eq!(body["content"], "Milk, eggs");
    assert_eq!(body["color"], "#fff475");
}

#[tokio::test]
async fn test_update_note_puts_to_id_query() {
    let server = CannedServer::start(vec![(200, r#"{"message":"ok"}"#)]).await;

    let draft = Draft::new("Groceries", "Milk", "#ffffff");
    server
        .client()
        .update_note(&session(), &NoteId::new("abc"), &draft)
        .await
        .unwrap();

    let requests = server.requests().await;
    assert!(requests[0].starts_with("put /api/notes/update?id=abc "));
}

#[tokio::test]
async fn test_delete_failure_uses_server_message() {
    let server =
        CannedServer::start(vec![(500, r#"{"message":"Could not delete note"}"#)]).await;

    let err = server
        .client()
        .delete_note(&session(), &NoteId::new("abc"))
        .await
        .unwrap_err();

    match err {
        NoteError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Could not delete note");
        }
        other => panic!("expected server error, got {other:?}"),
    }

    let requests = server.requests().await;
    assert!(requests[0].starts_with("delete /api/notes/delete?id=abc "));
}

#[tokio::test]
async fn test_error_without_message_reports_status() {
    let server = CannedServer::start(vec![(503, "")]).await;

    let err = server.client().list_notes(&session()).await.unwrap_err();
    assert_eq!(err.to_string(), "Server error: 503");
}

#[tokio::test]
async fn test_malformed_success_body() {
    let server = CannedServer::start(vec![(200, r#"{"unexpected":true}"#)]).await;

    let err = server.client().list_notes(&session()).await.unwrap_err();
    assert!(err.to_string().starts_with("Unexpected response from server"));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = RestClient::new(UNREACHABLE_API_URL).unwrap();

    let err = client.list_notes(&session()).await.unwrap_err();
    assert!(matches!(err, NoteError::Network(_)));
    assert_eq!(
        err.to_string(),
        "No response from server. Please check your connection."
    );
}

// ============================================================================
// Account endpoints
// ============================================================================

#[tokio::test]
async fn test_login_returns_session() {
    let server = CannedServer::start(vec![(
        200,
        r#"{"token":"tok-9","user":{"_id":"u1","name":"Ada","email":"ada@example.com"}}"#,
    )])
    .await;

    let response = server
        .client()
        .login("ada@example.com", "hunter2")
        .await
        .unwrap();
    let session = response.into_session();
    assert_eq!(session.token(), "tok-9");
    assert_eq!(session.user_id(), Some("u1"));

    let requests = server.requests().await;
    assert!(requests[0].starts_with("post /api/users/login "));
    assert!(!requests[0].contains("authorization:"));
}

#[tokio::test]
async fn test_register_posts_credentials() {
    let server =
        CannedServer::start(vec![(201, r#"{"message":"User registered"}"#)]).await;

    server
        .client()
        .register("Ada", "ada@example.com", "hunter2")
        .await
        .unwrap();

    let requests = server.requests().await;
    assert!(requests[0].starts_with("post /api/users/register "));
    assert!(!requests[0].contains("authorization:"));
    let body = body_of(&requests[0]);
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["password"], "hunter2");
}

#[tokio::test]
async fn test_register_conflict_uses_server_message() {
    let server = CannedServer::start(vec![(
        409,
        r#"{"message":"User already exists","error":"Conflict"}"#,
    )])
    .await;

    let err = server
        .client()
        .register("Ada", "ada@example.com", "hunter2")
        .await
        .unwrap_err();
    assert!(matches!(err, NoteError::Server { status: 409, .. }));
    assert_eq!(err.to_string(), "User already exists");

    server.requests().await;
}

#[tokio::test]
async fn test_logout_sends_bearer_token() {
    let server = CannedServer::start(vec![(200, r#"{"message":"Logged out"}"#)]).await;

    server.client().logout(&session()).await.unwrap();

    let requests = server.requests().await;
    assert!(requests[0].starts_with("post /api/users/logout "));
    assert!(requests[0].contains("authorization: bearer tok-123"));
}

#[tokio::test]
async fn test_logout_failure_uses_server_message() {
    let server = CannedServer::start(vec![(500, r#"{"message":"Session store down"}"#)]).await;

    let err = server.client().logout(&session()).await.unwrap_err();
    assert_eq!(err.to_string(), "Session store down");

    server.requests().await;
}

#[tokio::test]
async fn test_login_rejected() {
    let server =
        CannedServer::start(vec![(401, r#"{"message":"Invalid email or password"}"#)]).await;

    let err = server
        .client()
        .login("ada@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Invalid email or password");
}

// ============================================================================
// Controller over HTTP
// ============================================================================

#[tokio::test]
async fn test_dashboard_failed_delete_over_http() {
    let server = CannedServer::start(vec![
        (200, r#"[{"_id":"abc","title":"Keep me","content":"x"}]"#),
        (500, r#"{"message":"Could not delete note"}"#),
    ])
    .await;

    let sessions = StaticSession::logged_in("tok-123", Some(user()));
    let mut dashboard = DashboardController::new(sessions, server.client());
    dashboard.initialize().await.unwrap();

    assert!(dashboard.delete(&NoteId::new("abc")).await.is_err());
    assert!(dashboard.note(&NoteId::new("abc")).is_some());

    let toast = dashboard.take_toasts().pop().unwrap();
    assert_eq!(toast.message, "Could not delete note");

    server.requests().await;
}
