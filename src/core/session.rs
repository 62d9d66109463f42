use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::attachment::literal_message;
use crate::core::constants::{DEFAULT_SESSION_NAME, SESSION_NAME_MAX_CHARS};
use crate::core::message::{TranscriptRole, Turn};

/// One saved conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub messages: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation timestamp plus a random suffix, so two sessions created within
/// the same second still differ.
fn new_session_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}", now.format("%Y%m%d_%H%M%S"), &suffix[..8])
}

fn name_from_message(content: &str) -> String {
    literal_message(content)
        .chars()
        .take(SESSION_NAME_MAX_CHARS)
        .collect()
}

impl ChatSession {
    pub fn new(name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_session_id(now),
            name: name.unwrap_or_else(|| DEFAULT_SESSION_NAME.to_string()),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a turn. The first user turn also names the session.
    pub fn append_turn(
        &mut self,
        role: TranscriptRole,
        content: impl Into<String>,
        images: Option<Vec<String>>,
    ) {
        let turn = Turn::new(role, content).with_images(images.unwrap_or_default());
        self.push(turn);
    }

    pub fn push(&mut self, turn: Turn) {
        if self.messages.is_empty() && turn.role.is_user() {
            let name = name_from_message(&turn.content);
            if !name.trim().is_empty() {
                self.name = name;
            }
        }
        self.messages.push(turn);
        self.updated_at = Utc::now();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.messages.last()
    }
}

/// Sessions newest-first by creation order: the reverse of their position in
/// the collection. Activity does not reorder them.
pub fn list_sessions(sessions: &[ChatSession]) -> Vec<&ChatSession> {
    sessions.iter().rev().collect()
}
