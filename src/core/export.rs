use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};

use crate::core::config::data::path_display;
use crate::core::session::ChatSession;

const RULE_WIDTH: usize = 80;
const FILENAME_NAME_CHARS: usize = 20;

#[derive(Debug)]
pub enum ExportError {
    Empty,
    AlreadyExists(PathBuf),
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Empty => write!(f, "No conversation to export - the chat is empty."),
            ExportError::AlreadyExists(path) => write!(
                f,
                "File '{}' already exists. Choose another name or overwrite it.",
                path_display(path)
            ),
            ExportError::Io { path, source } => {
                write!(f, "Failed to write {}: {}", path_display(path), source)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Plain-text rendering of a session, stamped with `exported_at`.
pub fn render_export<Tz: TimeZone>(session: &ChatSession, exported_at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    let mut out = format!(
        "Chat Export: {}\nDate: {}\n{}\n\n",
        session.name,
        exported_at.format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(RULE_WIDTH)
    );
    for turn in &session.messages {
        out.push_str(turn.role.export_label());
        out.push_str(":\n");
        out.push_str(&turn.content);
        out.push_str("\n\n");
    }
    out
}

/// `chat_<name prefix>_<timestamp>.txt`, with path-hostile characters
/// replaced by underscores.
pub fn default_export_filename<Tz: TimeZone>(session: &ChatSession, now: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    let stem: String = session
        .name
        .chars()
        .take(FILENAME_NAME_CHARS)
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("chat_{}_{}.txt", stem, now.format("%Y%m%d_%H%M%S"))
}

pub fn export_session(
    session: &ChatSession,
    path: &Path,
    overwrite: bool,
) -> Result<PathBuf, ExportError> {
    if session.is_empty() {
        return Err(ExportError::Empty);
    }
    if !overwrite && path.exists() {
        return Err(ExportError::AlreadyExists(path.to_path_buf()));
    }

    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(render_export(session, &Local::now()).as_bytes())
        .map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(path.to_path_buf())
}
