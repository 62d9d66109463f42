use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::attachment::PendingAttachments;
use crate::core::session::{list_sessions, ChatSession};
use crate::core::config::data::path_display;
use crate::core::store::{LoadedSessions, SessionStore, StoreError};

pub mod actions;
pub mod conversation;
pub mod presenter;
pub mod session;


pub use actions::{apply_action, apply_actions, AppAction, AppCommand, SubmitError};
pub use conversation::SessionCommandError;
pub use presenter::Presenter;
pub use session::SessionContext;

/// The request currently awaiting a reply.
#[derive(Debug)]
pub struct InFlight {
    pub request_id: u64,
    /// Session the reply belongs to, which may no longer be the active one.
    pub session_id: String,
    pub cancel_token: CancellationToken,
}

#[derive(Debug, Default)]
pub enum RequestPhase {
    #[default]
    Idle,
    Sending(InFlight),
}

pub struct App {
    pub session: SessionContext,
    pub pending: PendingAttachments,
    pub(crate) sessions: Vec<ChatSession>,
    pub(crate) active_id: String,
    pub(crate) phase: RequestPhase,
    pub(crate) presenter: Box<dyn Presenter>,
    store: SessionStore,
    next_request_id: u64,
}

impl App {
    /// Load saved chats and pick the most recently created one. A missing or
    /// unreadable store leaves a single fresh chat, saved right away.
    pub fn new(session: SessionContext, store: SessionStore, presenter: Box<dyn Presenter>) -> Self {
        let LoadedSessions { sessions, warning } = store.load();
        let mut app = App {
            session,
            pending: PendingAttachments::default(),
            sessions,
            active_id: String::new(),
            phase: RequestPhase::Idle,
            presenter,
            store,
            next_request_id: 1,
        };

        if let Some(err) = warning {
            app.presenter
                .show_warning(&format!("Could not load saved chats: {err}"));
            if matches!(err, StoreError::Parse { .. }) {
                app.keep_corrupt_file();
            }
        }

        match app.sessions.last() {
            Some(last) => app.active_id = last.id.clone(),
            None => {
                let fresh = ChatSession::new(None);
                app.active_id = fresh.id.clone();
                app.sessions.push(fresh);
                app.persist();
            }
        }
        debug!(count = app.sessions.len(), active = %app.active_id, "sessions ready");
        app
    }

    fn keep_corrupt_file(&mut self) {
        match self.store.set_aside() {
            Ok(kept) => self.presenter.show_warning(&format!(
                "The unreadable file was kept as {}",
                path_display(&kept)
            )),
            Err(err) => warn!(error = %err, "could not move corrupt session file aside"),
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, RequestPhase::Sending(_))
    }

    pub fn in_flight(&self) -> Option<&InFlight> {
        match &self.phase {
            RequestPhase::Sending(in_flight) => Some(in_flight),
            RequestPhase::Idle => None,
        }
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn listing(&self) -> Vec<&ChatSession> {
        list_sessions(&self.sessions)
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub(crate) fn active_index(&self) -> usize {
        self.sessions
            .iter()
            .position(|s| s.id == self.active_id)
            .unwrap_or_else(|| self.sessions.len().saturating_sub(1))
    }

    pub fn active_session(&self) -> &ChatSession {
        &self.sessions[self.active_index()]
    }

    pub fn session_by_id(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub(crate) fn session_by_id_mut(&mut self, id: &str) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    pub fn store_path(&self) -> &std::path::Path {
        self.store.path()
    }

    pub(crate) fn allocate_request_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Write every session out. Failures are reported but never fatal.
    pub(crate) fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.sessions) {
            warn!(error = %err, "failed to save sessions");
            self.presenter
                .show_warning(&format!("Failed to save chats: {err}"));
        }
    }

    pub(crate) fn render_active(&mut self) {
        let index = self.active_index();
        self.presenter.render_transcript(&self.sessions[index]);
    }

    pub(crate) fn render_sessions(&mut self) {
        let listing = list_sessions(&self.sessions);
        self.presenter
            .render_session_list(&listing, &self.active_id);
    }

    /// Full redraw: sidebar, transcript, status.
    pub fn refresh(&mut self) {
        self.render_sessions();
        self.render_active();
        let status = self.status_line();
        self.presenter.set_status(&status);
    }

    pub fn status_line(&self) -> String {
        let state = if self.is_busy() { "generating" } else { "idle" };
        let mut line = format!(
            "model: {} | temperature: {:.1} | {}",
            self.session.model, self.session.temperature, state
        );
        if !self.pending.is_empty() {
            line.push_str(&format!(" | pending: {}", self.pending.summary()));
        }
        line
    }
}
