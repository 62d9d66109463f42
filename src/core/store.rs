//! Durable storage for the full collection of chat sessions.
//!
//! The collection is written wholesale as one JSON document on every save.
//! Saves go through a temp file in the target directory and an atomic
//! rename, so a crash mid-write leaves the previous file intact.

use std::collections::HashSet;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::core::config::data::path_display;
use crate::core::constants::SESSION_FILE_VERSION;
use crate::core::session::ChatSession;

#[derive(Debug)]
pub enum StoreError {
    /// The session file exists but could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The session file is not a valid session document.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Serializing the in-memory collection failed.
    Serialize(serde_json::Error),

    /// Writing or replacing the session file failed.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Read { path, source } => {
                write!(f, "Failed to read sessions at {}: {}", path_display(path), source)
            }
            StoreError::Parse { path, source } => write!(
                f,
                "Session file at {} is corrupted ({}); starting with no saved chats",
                path_display(path),
                source
            ),
            StoreError::Serialize(source) => write!(f, "Failed to serialize sessions: {source}"),
            StoreError::Write { path, source } => {
                write!(f, "Failed to save sessions to {}: {}", path_display(path), source)
            }
        }
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StoreError::Read { source, .. } => Some(source),
            StoreError::Parse { source, .. } => Some(source),
            StoreError::Serialize(source) => Some(source),
            StoreError::Write { source, .. } => Some(source),
        }
    }
}

#[derive(Serialize)]
struct SessionFileRef<'a> {
    version: u32,
    sessions: &'a [ChatSession],
}

#[derive(Deserialize)]
struct SessionFile {
    version: u32,
    sessions: Vec<ChatSession>,
}

/// Result of [`SessionStore::load`]. A warning means the file was present
/// but unusable and the collection was reset.
#[derive(Debug, Default)]
pub struct LoadedSessions {
    pub sessions: Vec<ChatSession>,
    pub warning: Option<StoreError>,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> LoadedSessions {
        match self.try_load() {
            Ok(sessions) => {
                debug!(count = sessions.len(), path = %self.path.display(), "loaded sessions");
                LoadedSessions {
                    sessions,
                    warning: None,
                }
            }
            Err(err) => {
                warn!("{err}");
                LoadedSessions {
                    sessions: Vec::new(),
                    warning: Some(err),
                }
            }
        }
    }

    fn try_load(&self) -> Result<Vec<ChatSession>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let bytes = fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let file: SessionFile =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!(version = file.version, "parsed session file");
        let mut seen = HashSet::new();
        let mut sessions = Vec::with_capacity(file.sessions.len());
        for session in file.sessions {
            if seen.insert(session.id.clone()) {
                sessions.push(session);
            } else {
                warn!(id = %session.id, "dropping session with duplicate id");
            }
        }
        Ok(sessions)
    }

    pub fn save(&self, sessions: &[ChatSession]) -> Result<(), StoreError> {
        let document = SessionFileRef {
            version: SESSION_FILE_VERSION,
            sessions,
        };
        let contents = serde_json::to_vec_pretty(&document).map_err(StoreError::Serialize)?;
        self.write_atomically(&contents)
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        debug!(count = sessions.len(), path = %self.path.display(), "saved sessions");
        Ok(())
    }

    /// Rename an unreadable session file to `<name>.corrupt` so the next
    /// save does not overwrite it. Returns the new location.
    pub fn set_aside(&self) -> std::io::Result<PathBuf> {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".corrupt");
        let target = PathBuf::from(name);
        fs::rename(&self.path, &target)?;
        Ok(target)
    }

    fn write_atomically(&self, contents: &[u8]) -> std::io::Result<()> {
        let parent = self.path.parent().filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new_in(".")?,
        };
        temp_file.write_all(contents)?;
        temp_file.as_file_mut().sync_all()?;
        temp_file.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::TranscriptRole;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("sessions.json"))
    }

    fn session_with_turns(name: &str, turns: usize) -> ChatSession {
        let mut session = ChatSession::new(Some(name.to_string()));
        for i in 0..turns {
            let role = if i % 2 == 0 {
                TranscriptRole::User
            } else {
                TranscriptRole::Assistant
            };
            session.append_turn(role, format!("{name} turn {i}"), None);
        }
        session
    }

    #[test]
    fn missing_file_loads_empty_without_warning() {
        let dir = TempDir::new().expect("temp dir");
        let loaded = store_in(&dir).load();
        assert!(loaded.sessions.is_empty());
        assert!(loaded.warning.is_none());
    }

    #[test]
    fn round_trips_empty_collection() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        store.save(&[]).expect("save");

        let loaded = store.load();
        assert!(loaded.sessions.is_empty());
        assert!(loaded.warning.is_none());
    }

    #[test]
    fn round_trips_sessions_with_varied_transcripts() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);

        let mut with_notice = session_with_turns("errors", 1);
        with_notice.append_turn(TranscriptRole::Notice, "Error: 500 - boom", None);
        let mut with_image = ChatSession::new(None);
        with_image.append_turn(
            TranscriptRole::User,
            "what is this?",
            Some(vec!["aGVsbG8=".into(), "d29ybGQ=".into()]),
        );
        let sessions = vec![
            session_with_turns("empty", 0),
            session_with_turns("single", 1),
            session_with_turns("many", 7),
            with_notice,
            with_image,
        ];

        store.save(&sessions).expect("save");
        let loaded = store.load();

        assert!(loaded.warning.is_none());
        assert_eq!(loaded.sessions, sessions);
    }

    #[test]
    fn corrupted_file_loads_empty_with_warning() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        fs::write(store.path(), b"\x80\x04\x95not json at all").expect("write garbage");

        let loaded = store.load();
        assert!(loaded.sessions.is_empty());
        assert!(matches!(loaded.warning, Some(StoreError::Parse { .. })));
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        let original = session_with_turns("original", 2);
        let mut clone = original.clone();
        clone.name = "impostor".into();

        store.save(&[original.clone(), clone]).expect("save");
        let loaded = store.load();
        assert_eq!(loaded.sessions, vec![original]);
    }

    #[test]
    fn save_replaces_previous_contents_and_creates_parent_dirs() {
        let dir = TempDir::new().expect("temp dir");
        let store = SessionStore::new(dir.path().join("nested").join("deeper").join("s.json"));

        store.save(&[session_with_turns("first", 1)]).expect("first save");
        let second = vec![session_with_turns("second", 2)];
        store.save(&second).expect("second save");

        assert_eq!(store.load().sessions, second);
        let leftovers: Vec<_> = fs::read_dir(store.path().parent().expect("parent"))
            .expect("read dir")
            .filter_map(Result::ok)
            .filter(|entry| entry.path() != store.path())
            .collect();
        assert!(leftovers.is_empty(), "temp files should not linger");
    }

    #[test]
    fn write_failure_is_reported_not_panicked() {
        let dir = TempDir::new().expect("temp dir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"file, not a directory").expect("write blocker");
        let store = SessionStore::new(blocker.join("sessions.json"));

        let err = store.save(&[]).expect_err("save should fail");
        assert!(matches!(err, StoreError::Write { .. }));
    }
}
