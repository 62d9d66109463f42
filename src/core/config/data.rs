use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama2";
pub const DEFAULT_VISION_MODEL: &str = "llava";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant that can analyze files and images.";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 2;

pub const MIN_TEMPERATURE: f64 = 0.0;
pub const MAX_TEMPERATURE: f64 = 2.0;

/// On-disk configuration. Every field is optional; unset fields fall back to
/// the defaults above (see `defaults.rs`).
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Root URL of the inference server (e.g., "http://localhost:11434")
    pub base_url: Option<String>,
    /// Model used for new requests
    pub model: Option<String>,
    /// Model recommended when images are attached
    pub vision_model: Option<String>,
    /// Sampling temperature sent with every request
    pub temperature: Option<f64>,
    /// System prompt placed ahead of every transcript
    pub system_prompt: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub probe_timeout_secs: Option<u64>,
    /// Where saved chats live. Defaults to the platform data directory.
    pub sessions_file: Option<PathBuf>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.local/share/chatdesk/sessions.json` → `~/.local/share/chatdesk/sessions.json`
/// - Windows: paths are shown unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

/// Clamp a temperature into the range the server accepts.
pub fn clamp_temperature(value: f64) -> f64 {
    if value.is_nan() {
        return DEFAULT_TEMPERATURE;
    }
    value.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
}
