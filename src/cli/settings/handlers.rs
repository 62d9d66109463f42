//! Setting handlers, one per configuration key shape.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{success_set, success_unset, truncate_with_ellipsis};
use crate::cli::settings::SettingHandler;
use crate::commands::expand_path;
use crate::core::config::data::{Config, MAX_TEMPERATURE, MIN_TEMPERATURE};
use crate::utils::url::normalize_base_url;

fn join_args(args: &[String]) -> Option<String> {
    let value = args.join(" ");
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Free-text settings such as `model` and `system-prompt`.
pub struct TextSetting {
    pub key: &'static str,
    pub hint: &'static str,
    pub example: &'static str,
    pub slot: fn(&mut Config) -> &mut Option<String>,
}

impl SettingHandler for TextSetting {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let value = join_args(args).ok_or(SettingError::MissingArgs {
            hint: self.hint,
            example: self.example,
        })?;
        let message = success_set(self.key, &truncate_with_ellipsis(&value, 50));
        *(self.slot)(config) = Some(value);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> String {
        *(self.slot)(config) = None;
        success_unset(self.key)
    }
}

pub struct BaseUrlHandler;

impl SettingHandler for BaseUrlHandler {
    fn key(&self) -> &'static str {
        "base-url"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let value = join_args(args).ok_or(SettingError::MissingArgs {
            hint: "To set the server address, provide its URL:",
            example: "chatdesk set base-url http://localhost:11434",
        })?;
        if !(value.starts_with("http://") || value.starts_with("https://")) {
            return Err(SettingError::InvalidValue {
                key: "base-url",
                input: value,
                expected: "an http:// or https:// URL",
            });
        }
        let url = normalize_base_url(&value);
        let message = success_set("base-url", &url);
        config.base_url = Some(url);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> String {
        config.base_url = None;
        success_unset("base-url")
    }
}

pub struct TemperatureHandler;

impl SettingHandler for TemperatureHandler {
    fn key(&self) -> &'static str {
        "temperature"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = join_args(args).ok_or(SettingError::MissingArgs {
            hint: "To set the temperature, provide a number:",
            example: "chatdesk set temperature 0.7",
        })?;
        match input.parse::<f64>() {
            Ok(value) if (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value) => {
                config.temperature = Some(value);
                Ok(success_set("temperature", &format!("{value:.1}")))
            }
            _ => Err(SettingError::InvalidValue {
                key: "temperature",
                input,
                expected: "a number between 0.0 and 2.0",
            }),
        }
    }

    fn unset(&self, config: &mut Config) -> String {
        config.temperature = None;
        success_unset("temperature")
    }
}

/// Whole-second timeouts.
pub struct TimeoutSetting {
    pub key: &'static str,
    pub example: &'static str,
    pub slot: fn(&mut Config) -> &mut Option<u64>,
}

impl SettingHandler for TimeoutSetting {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = join_args(args).ok_or(SettingError::MissingArgs {
            hint: "Provide the timeout in seconds:",
            example: self.example,
        })?;
        match input.trim_end_matches('s').parse::<u64>() {
            Ok(secs) if secs > 0 => {
                *(self.slot)(config) = Some(secs);
                Ok(success_set(self.key, &format!("{secs}s")))
            }
            _ => Err(SettingError::InvalidValue {
                key: self.key,
                input,
                expected: "a whole number of seconds greater than zero",
            }),
        }
    }

    fn unset(&self, config: &mut Config) -> String {
        *(self.slot)(config) = None;
        success_unset(self.key)
    }
}

pub struct SessionsFileHandler;

impl SettingHandler for SessionsFileHandler {
    fn key(&self) -> &'static str {
        "sessions-file"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let value = join_args(args).ok_or(SettingError::MissingArgs {
            hint: "To move saved chats, provide a file path:",
            example: "chatdesk set sessions-file ~/chats/sessions.json",
        })?;
        let path = expand_path(&value);
        let message = success_set("sessions-file", &path.display().to_string());
        config.sessions_file = Some(path);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> String {
        config.sessions_file = None;
        success_unset("sessions-file")
    }
}
