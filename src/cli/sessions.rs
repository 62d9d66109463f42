//! Saved-chat listing and export outside the interactive loop.

use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::core::export::{default_export_filename, export_session};
use crate::core::session::{list_sessions, ChatSession};
use crate::core::store::SessionStore;

fn load(store: &SessionStore) -> Vec<ChatSession> {
    let loaded = store.load();
    if let Some(warning) = loaded.warning {
        eprintln!("⚠️  {warning}");
    }
    loaded.sessions
}

/// Find a session by exact id or by its 1-based position in the
/// newest-first listing.
pub fn find_session<'a>(sessions: &'a [ChatSession], reference: &str) -> Option<&'a ChatSession> {
    let reference = reference.trim();
    if let Some(session) = sessions.iter().find(|s| s.id == reference) {
        return Some(session);
    }
    let position: usize = reference.parse().ok()?;
    list_sessions(sessions)
        .into_iter()
        .nth(position.checked_sub(1)?)
}

pub fn format_listing(sessions: &[ChatSession]) -> Vec<String> {
    list_sessions(sessions)
        .iter()
        .enumerate()
        .map(|(index, session)| {
            format!(
                "{:>3}. {}  {} ({} messages, updated {})",
                index + 1,
                session.id,
                session.name,
                session.messages.len(),
                session
                    .updated_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
            )
        })
        .collect()
}

pub fn print_sessions(store_path: &Path) {
    let store = SessionStore::new(store_path);
    let sessions = load(&store);
    if sessions.is_empty() {
        println!("No saved chats in {}", store_path.display());
        return;
    }
    println!("💬 Saved chats ({})", sessions.len());
    println!();
    for line in format_listing(&sessions) {
        println!("{line}");
    }
}

pub fn export_saved_session(
    store_path: &Path,
    reference: &str,
    file: Option<PathBuf>,
    overwrite: bool,
) -> Result<PathBuf, Box<dyn Error>> {
    let store = SessionStore::new(store_path);
    let sessions = load(&store);
    let session = find_session(&sessions, reference)
        .ok_or_else(|| format!("No saved chat matches '{reference}'"))?;
    let path =
        file.unwrap_or_else(|| PathBuf::from(default_export_filename(session, &Local::now())));
    Ok(export_session(session, &path, overwrite)?)
}
