use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use super::App;
use crate::core::attachment::{read_image_attachment, read_text_attachment, AttachmentReadError};
use crate::core::export::{default_export_filename, export_session, ExportError};
use crate::core::session::ChatSession;

#[derive(Debug, PartialEq, Eq)]
pub enum SessionCommandError {
    NotFound(String),
    /// The chat is waiting on a reply and cannot be removed yet.
    Busy,
}

impl fmt::Display for SessionCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionCommandError::NotFound(reference) => write!(f, "No chat matches '{reference}'"),
            SessionCommandError::Busy => {
                write!(f, "That chat is still waiting for a response")
            }
        }
    }
}

impl std::error::Error for SessionCommandError {}

impl App {
    pub fn new_session(&mut self) -> &ChatSession {
        let session = ChatSession::new(None);
        debug!(id = %session.id, "new session");
        self.active_id = session.id.clone();
        self.sessions.push(session);
        self.persist();
        self.render_sessions();
        self.render_active();
        self.presenter.set_status("Started a new chat");
        self.active_session()
    }

    pub fn switch_session(&mut self, id: &str) -> Result<(), SessionCommandError> {
        if self.session_by_id(id).is_none() {
            return Err(SessionCommandError::NotFound(id.to_string()));
        }
        self.active_id = id.to_string();
        self.render_sessions();
        self.render_active();
        Ok(())
    }

    /// Remove a chat for good. Removing the last one leaves a fresh empty
    /// chat in its place.
    pub fn delete_session(&mut self, id: &str) -> Result<(), SessionCommandError> {
        if self.in_flight().is_some_and(|f| f.session_id == id) {
            return Err(SessionCommandError::Busy);
        }
        let index = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| SessionCommandError::NotFound(id.to_string()))?;

        let removed = self.sessions.remove(index);
        debug!(id = %removed.id, "deleted session");
        if self.sessions.is_empty() {
            self.sessions.push(ChatSession::new(None));
        }
        if self.active_id == removed.id {
            if let Some(last) = self.sessions.last() {
                self.active_id = last.id.clone();
            }
        }
        self.persist();
        self.render_sessions();
        self.render_active();
        self.presenter
            .set_status(&format!("Deleted chat '{}'", removed.name));
        Ok(())
    }

    /// Resolve a 1-based position in the newest-first listing, or an exact id.
    pub fn resolve_session_ref(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        if let Ok(position) = reference.parse::<usize>() {
            if let Some(session) = position
                .checked_sub(1)
                .and_then(|index| self.listing().get(index).copied())
            {
                return Some(session.id.clone());
            }
        }
        self.session_by_id(reference).map(|s| s.id.clone())
    }

    pub fn attach_file(&mut self, path: &Path) -> Result<(), AttachmentReadError> {
        let attachment = read_text_attachment(path)?;
        let note = if attachment.truncated {
            " (truncated)"
        } else {
            ""
        };
        let name = attachment.name.clone();
        self.pending.files.push(attachment);
        let status = format!("Attached {name}{note} - {}", self.pending.summary());
        self.presenter.set_status(&status);
        Ok(())
    }

    pub fn attach_image(&mut self, path: &Path) -> Result<(), AttachmentReadError> {
        let image = read_image_attachment(path)?;
        let name = image.name.clone();
        self.pending.images.push(image);
        let status = format!("Attached image {name} - {}", self.pending.summary());
        self.presenter.set_status(&status);
        if self.session.model != self.session.vision_model {
            let vision_model = self.session.vision_model.clone();
            self.presenter.recommend_model(&vision_model);
        }
        Ok(())
    }

    pub fn clear_attachments(&mut self) {
        self.pending.clear();
        self.presenter.set_status("Attachments cleared");
    }

    pub fn set_model(&mut self, model: &str) {
        self.session.model = model.trim().to_string();
        let status = format!("Model set to {}", self.session.model);
        self.presenter.set_status(&status);
    }

    pub fn set_temperature(&mut self, value: f64) -> f64 {
        let applied = self.session.set_temperature(value);
        self.presenter
            .set_status(&format!("Temperature set to {applied:.1}"));
        applied
    }

    pub fn set_system_prompt(&mut self, prompt: &str) {
        self.session.system_prompt = prompt.trim().to_string();
        self.presenter.set_status("System prompt updated");
    }

    /// Write the active chat to `path`, or to a timestamped file in the
    /// working directory.
    pub fn export_active(
        &self,
        path: Option<PathBuf>,
        overwrite: bool,
    ) -> Result<PathBuf, ExportError> {
        let session = self.active_session();
        let path = path
            .unwrap_or_else(|| PathBuf::from(default_export_filename(session, &Local::now())));
        export_session(session, &path, overwrite)
    }
}
