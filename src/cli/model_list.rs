//! Model listing and connectivity checks
//!
//! These back the `models` and `ping` subcommands.

use std::error::Error;

use chrono::{DateTime, Utc};

use crate::api::models::{check_connection, fetch_models, sort_models, ConnectionStatus};
use crate::api::ModelInfo;
use crate::core::config::data::Config;

pub async fn list_models(config: &Config) -> Result<(), Box<dyn Error>> {
    let base_url = config.effective_base_url();
    let client = reqwest::Client::new();
    let models_response = fetch_models(&client, base_url, config.request_timeout()).await?;

    println!("🤖 Models available at {base_url}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    if models_response.models.is_empty() {
        println!("No models installed on this server.");
        return Ok(());
    }

    let mut models = models_response.models;
    sort_models(&mut models);
    let current = config.effective_model();

    for model in &models {
        print!("{}", format_model(model));
        if model.name == current {
            println!("    (current default)");
        }
        println!();
    }

    Ok(())
}

fn format_model(model: &ModelInfo) -> String {
    let mut out = format!("  • {}\n", model.name);
    if let Some(size) = model.size {
        out.push_str(&format!("    Size: {}\n", format_size(size)));
    }
    if let Some(modified) = model.modified_at.as_deref().filter(|s| !s.is_empty()) {
        // The server sends RFC 3339; show it as-is if it doesn't parse.
        let shown = DateTime::parse_from_rfc3339(modified)
            .map(|dt| {
                dt.with_timezone(&Utc)
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string()
            })
            .unwrap_or_else(|_| modified.to_string());
        out.push_str(&format!("    Modified: {shown}\n"));
    }
    out
}

/// Human-readable byte count using binary units.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Probe the server once. Returns whether it answered successfully.
pub async fn ping(config: &Config) -> bool {
    let base_url = config.effective_base_url();
    let client = reqwest::Client::new();
    let status = check_connection(&client, base_url, config.probe_timeout()).await;
    match &status {
        ConnectionStatus::Connected => println!("{} to {base_url}", status.label()),
        ConnectionStatus::Error(_) => println!("{} from {base_url}", status.label()),
        ConnectionStatus::Disconnected(reason) => {
            println!("{} from {base_url}: {reason}", status.label())
        }
    }
    status.is_connected()
}
