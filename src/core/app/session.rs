use std::time::Duration;

use reqwest::Client;

use crate::api::CHAT_ENDPOINT;
use crate::core::config::data::clamp_temperature;
use crate::core::config::Config;
use crate::utils::url::{construct_api_url, normalize_base_url};

/// Connection and generation settings for the running process. Changes made
/// here last for the run only; `chatdesk set` edits the saved config.
pub struct SessionContext {
    pub client: Client,
    pub base_url: String,
    pub model: String,
    pub vision_model: String,
    pub temperature: f64,
    pub system_prompt: String,
    pub request_timeout: Duration,
    pub probe_timeout: Duration,
}

impl SessionContext {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: normalize_base_url(config.effective_base_url()),
            model: config.effective_model().to_string(),
            vision_model: config.effective_vision_model().to_string(),
            temperature: config.effective_temperature(),
            system_prompt: config.effective_system_prompt().to_string(),
            request_timeout: config.request_timeout(),
            probe_timeout: config.probe_timeout(),
        }
    }

    pub fn chat_url(&self) -> String {
        construct_api_url(&self.base_url, CHAT_ENDPOINT)
    }

    /// Returns the value actually applied.
    pub fn set_temperature(&mut self, value: f64) -> f64 {
        self.temperature = clamp_temperature(value);
        self.temperature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_config() {
        let session = SessionContext::with_client(Client::new(), &Config::default());
        assert_eq!(session.base_url, "http://localhost:11434");
        assert_eq!(session.model, "llama2");
        assert_eq!(session.vision_model, "llava");
        assert_eq!(session.temperature, 0.7);
        assert_eq!(session.request_timeout, Duration::from_secs(120));
        assert_eq!(session.probe_timeout, Duration::from_secs(2));
        assert_eq!(session.chat_url(), "http://localhost:11434/api/chat");
    }

    #[test]
    fn overrides_and_clamping_apply() {
        let config = Config {
            base_url: Some("http://gpu-box:11434/".into()),
            model: Some("mistral".into()),
            temperature: Some(5.0),
            ..Config::default()
        };
        let mut session = SessionContext::with_client(Client::new(), &config);
        assert_eq!(session.chat_url(), "http://gpu-box:11434/api/chat");
        assert_eq!(session.model, "mistral");
        assert_eq!(session.temperature, 2.0);

        assert_eq!(session.set_temperature(-1.0), 0.0);
        assert_eq!(session.set_temperature(1.3), 1.3);
    }
}
