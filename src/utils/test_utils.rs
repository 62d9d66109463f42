use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::api::models::ConnectionStatus;
use crate::core::app::{App, Presenter, SessionContext};
use crate::core::config::Config;
use crate::core::session::ChatSession;
use crate::core::store::SessionStore;

/// What the one-shot responder received.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub body: String,
}

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

fn content_length(headers: &str) -> usize {
    headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Serve exactly one HTTP request on a loopback port with a canned reply,
/// optionally after `delay`. Returns the base URL and a handle yielding the
/// captured request.
pub async fn spawn_http_responder(
    status: u16,
    body: String,
    delay: Option<Duration>,
) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind responder");
    let addr = listener.local_addr().expect("responder addr");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let head_len = loop {
            let n = socket.read(&mut chunk).await.expect("read request");
            if n == 0 {
                break header_end(&buf).unwrap_or(buf.len());
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = header_end(&buf) {
                break end;
            }
        };
        let headers = String::from_utf8_lossy(&buf[..head_len]).into_owned();
        let wanted = head_len + content_length(&headers);
        while buf.len() < wanted {
            let n = socket.read(&mut chunk).await.expect("read body");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = format!(
            "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        // The client may already have given up.
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;

        CapturedRequest {
            request_line: headers.lines().next().unwrap_or_default().to_string(),
            body: String::from_utf8_lossy(&buf[head_len..]).into_owned(),
        }
    });

    (format!("http://{addr}"), handle)
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    Transcript { session_id: String, turns: usize },
    SessionList { ids: Vec<String>, active_id: String },
    Status(String),
    Busy(bool),
    Warning(String),
    RecommendModel(String),
    Connection(ConnectionStatus),
}

/// Presenter that records every call, shared with the test through an `Rc`.
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    events: Rc<RefCell<Vec<PresenterEvent>>>,
}

impl RecordingPresenter {
    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PresenterEvent::Warning(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn busy_changes(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PresenterEvent::Busy(busy) => Some(busy),
                _ => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<String> {
        self.events()
            .into_iter()
            .rev()
            .find_map(|event| match event {
                PresenterEvent::Status(status) => Some(status),
                _ => None,
            })
    }

    fn record(&self, event: PresenterEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn render_transcript(&mut self, session: &ChatSession) {
        self.record(PresenterEvent::Transcript {
            session_id: session.id.clone(),
            turns: session.messages.len(),
        });
    }

    fn render_session_list(&mut self, sessions: &[&ChatSession], active_id: &str) {
        self.record(PresenterEvent::SessionList {
            ids: sessions.iter().map(|s| s.id.clone()).collect(),
            active_id: active_id.to_string(),
        });
    }

    fn set_status(&mut self, status: &str) {
        self.record(PresenterEvent::Status(status.to_string()));
    }

    fn set_busy(&mut self, busy: bool) {
        self.record(PresenterEvent::Busy(busy));
    }

    fn show_warning(&mut self, message: &str) {
        self.record(PresenterEvent::Warning(message.to_string()));
    }

    fn recommend_model(&mut self, model: &str) {
        self.record(PresenterEvent::RecommendModel(model.to_string()));
    }

    fn set_connection(&mut self, status: &ConnectionStatus) {
        self.record(PresenterEvent::Connection(status.clone()));
    }
}

pub fn test_config(dir: &Path, base_url: &str) -> Config {
    Config {
        base_url: Some(base_url.to_string()),
        system_prompt: Some("You are helpful.".to_string()),
        sessions_file: Some(dir.join("sessions.json")),
        ..Config::default()
    }
}

/// App backed by `dir/sessions.json` and talking to `base_url`.
pub fn create_test_app_with_url(dir: &Path, base_url: &str) -> (App, RecordingPresenter) {
    let config = test_config(dir, base_url);
    let presenter = RecordingPresenter::default();
    let app = App::new(
        SessionContext::with_client(reqwest::Client::new(), &config),
        SessionStore::new(config.effective_sessions_file()),
        Box::new(presenter.clone()),
    );
    (app, presenter)
}

pub fn create_test_app(dir: &Path) -> (App, RecordingPresenter) {
    create_test_app_with_url(dir, "http://127.0.0.1:9")
}
