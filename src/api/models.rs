//! Liveness probe and model listing against the server's `/api/tags`.

use std::time::Duration;

use tracing::debug;

use crate::api::{ModelInfo, ModelsResponse};
use crate::utils::url::construct_api_url;

pub const TAGS_ENDPOINT: &str = "api/tags";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    /// The server answered with a non-success status.
    Error(u16),
    Disconnected(String),
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    pub fn label(&self) -> String {
        match self {
            ConnectionStatus::Connected => "● Connected".to_string(),
            ConnectionStatus::Error(status) => format!("● Error (HTTP {status})"),
            ConnectionStatus::Disconnected(_) => "● Disconnected".to_string(),
        }
    }
}

pub async fn check_connection(
    client: &reqwest::Client,
    base_url: &str,
    timeout: Duration,
) -> ConnectionStatus {
    let url = construct_api_url(base_url, TAGS_ENDPOINT);
    match client.get(&url).timeout(timeout).send().await {
        Ok(response) if response.status().is_success() => ConnectionStatus::Connected,
        Ok(response) => ConnectionStatus::Error(response.status().as_u16()),
        Err(err) => {
            debug!(%url, error = %err, "liveness probe failed");
            ConnectionStatus::Disconnected(err.to_string())
        }
    }
}

pub async fn fetch_models(
    client: &reqwest::Client,
    base_url: &str,
    timeout: Duration,
) -> Result<ModelsResponse, Box<dyn std::error::Error>> {
    let url = construct_api_url(base_url, TAGS_ENDPOINT);
    let response = client.get(url).timeout(timeout).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(format!("API request failed with status {status}: {error_text}").into());
    }

    let models_response = response.json::<ModelsResponse>().await?;
    Ok(models_response)
}

/// Alphabetical, case-insensitive, for stable listings.
pub fn sort_models(models: &mut [ModelInfo]) {
    models.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}
