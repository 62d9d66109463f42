//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::{
    BaseUrlHandler, SessionsFileHandler, TemperatureHandler, TextSetting, TimeoutSetting,
};
use super::SettingHandler;

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `chatdesk config` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(BaseUrlHandler));
        registry.register(Box::new(TextSetting {
            key: "model",
            hint: "To set the default model, provide its name:",
            example: "chatdesk set model llama2",
            slot: |config| &mut config.model,
        }));
        registry.register(Box::new(TextSetting {
            key: "vision-model",
            hint: "To set the model suggested for images, provide its name:",
            example: "chatdesk set vision-model llava",
            slot: |config| &mut config.vision_model,
        }));
        registry.register(Box::new(TemperatureHandler));
        registry.register(Box::new(TextSetting {
            key: "system-prompt",
            hint: "To set the system prompt, provide the text:",
            example: "chatdesk set system-prompt \"You are a concise assistant.\"",
            slot: |config| &mut config.system_prompt,
        }));
        registry.register(Box::new(TimeoutSetting {
            key: "request-timeout",
            example: "chatdesk set request-timeout 300",
            slot: |config| &mut config.request_timeout_secs,
        }));
        registry.register(Box::new(TimeoutSetting {
            key: "probe-timeout",
            example: "chatdesk set probe-timeout 5",
            slot: |config| &mut config.probe_timeout_secs,
        }));
        registry.register(Box::new(SessionsFileHandler));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    /// Get a handler by key.
    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    /// Get all keys in display order.
    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
