use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

type InitError = Box<dyn std::error::Error>;

pub const LOG_ENV_VAR: &str = "CHATDESK_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber. Logs go to stderr, or are appended to
/// `log_file` without color codes.
pub fn init_tracing(log_file: Option<&Path>) -> Result<(), InitError> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| err as InitError)?;
        }
        None => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| err as InitError)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn unwritable_log_file_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("missing").join("chatdesk.log");
        assert!(init_tracing(Some(&path)).is_err());
    }

    #[test]
    fn second_install_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("chatdesk.log");
        // Another test may already own the global subscriber, so only the
        // second call has a known outcome.
        let _ = init_tracing(Some(&path));
        let err = init_tracing(Some(&path)).expect_err("global subscriber already set");
        assert!(!err.to_string().is_empty());
    }
}
