use std::path::PathBuf;
use std::time::Duration;

use crate::core::config::data::{
    clamp_temperature, Config, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_PROBE_TIMEOUT_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE,
    DEFAULT_VISION_MODEL,
};

impl Config {
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn effective_vision_model(&self) -> &str {
        self.vision_model.as_deref().unwrap_or(DEFAULT_VISION_MODEL)
    }

    pub fn effective_temperature(&self) -> f64 {
        clamp_temperature(self.temperature.unwrap_or(DEFAULT_TEMPERATURE))
    }

    pub fn effective_system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(
            self.probe_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS),
        )
    }

    pub fn effective_sessions_file(&self) -> PathBuf {
        self.sessions_file
            .clone()
            .unwrap_or_else(Config::default_sessions_path)
    }
}
