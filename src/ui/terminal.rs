//! Line-oriented rendering of transcripts, sidebar listings and status.

use std::io::Write;

use chrono::Local;
use tracing::debug;

use crate::api::models::ConnectionStatus;
use crate::core::app::Presenter;
use crate::core::attachment::literal_message;
use crate::core::message::{TranscriptRole, Turn};
use crate::core::session::ChatSession;

/// Prints each turn once. Re-rendering the same session only prints the
/// turns added since the last render; a different session is printed from
/// the top under a header.
pub struct TerminalPresenter<W: Write> {
    out: W,
    shown: Option<(String, usize)>,
    busy: bool,
}

fn attached_file_count(content: &str) -> usize {
    content[literal_message(content).len()..]
        .matches("\nFile: ")
        .count()
}

fn format_turn(turn: &Turn) -> String {
    match turn.role {
        TranscriptRole::User => {
            let mut line = format!("You: {}", literal_message(&turn.content));
            let files = attached_file_count(&turn.content);
            let images = turn.images.as_ref().map_or(0, Vec::len);
            if files > 0 || images > 0 {
                line.push_str(&format!("\n     [attached: {files} file(s), {images} image(s)]"));
            }
            line
        }
        TranscriptRole::Assistant => format!("Assistant: {}", turn.content),
        TranscriptRole::System | TranscriptRole::Notice => format!("System: {}", turn.content),
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown: None,
            busy: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        let result = writeln!(self.out, "{text}").and_then(|_| self.out.flush());
        if let Err(err) = result {
            debug!(error = %err, "terminal write failed");
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render_transcript(&mut self, session: &ChatSession) {
        let start = match &self.shown {
            Some((id, count)) if *id == session.id && *count <= session.messages.len() => *count,
            _ => {
                self.emit(&format!("\n== {} ==", session.name));
                0
            }
        };
        for turn in &session.messages[start..] {
            let text = format_turn(turn);
            self.emit(&text);
            self.emit("");
        }
        self.shown = Some((session.id.clone(), session.messages.len()));
    }

    fn render_session_list(&mut self, sessions: &[&ChatSession], active_id: &str) {
        self.emit("Chats:");
        for (index, session) in sessions.iter().enumerate() {
            let marker = if session.id == active_id { '*' } else { ' ' };
            let created = session.created_at.with_timezone(&Local);
            let line = format!(
                " {marker}{:>3}. {} ({} messages, {})",
                index + 1,
                session.name,
                session.messages.len(),
                created.format("%Y-%m-%d %H:%M")
            );
            self.emit(&line);
        }
    }

    fn set_status(&mut self, status: &str) {
        self.emit(&format!("-- {status}"));
    }

    fn set_busy(&mut self, busy: bool) {
        if busy && !self.busy {
            self.emit("... waiting for the model (/cancel to stop)");
        }
        self.busy = busy;
    }

    fn show_warning(&mut self, message: &str) {
        self.emit(&format!("Warning: {message}"));
    }

    fn recommend_model(&mut self, model: &str) {
        self.emit(&format!(
            "Tip: images need a vision model. Switch with /model {model}"
        ));
    }

    fn set_connection(&mut self, status: &ConnectionStatus) {
        let line = match status {
            ConnectionStatus::Disconnected(reason) => format!("Server: {} ({reason})", status.label()),
            _ => format!("Server: {}", status.label()),
        };
        self.emit(&line);
    }
}
