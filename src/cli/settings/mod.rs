//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a [`SettingHandler`] that validates input and
//! updates the corresponding [`Config`] field. Handlers never touch the disk;
//! [`set_setting`] and [`unset_setting`] load, mutate and save the file.

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

#[cfg(test)]
mod tests;

use std::path::Path;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::Config;
use helpers::mutate_config_at;

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Validate `args` and store the value.
    ///
    /// # Returns
    /// A success message to display, or an error.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value so the default applies again.
    fn unset(&self, config: &mut Config) -> String;
}

fn handler_for<'a>(
    registry: &'a SettingRegistry,
    key: &str,
) -> Result<&'a dyn SettingHandler, SettingError> {
    registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))
}

pub fn set_setting(config_path: &Path, key: &str, args: &[String]) -> Result<String, SettingError> {
    let registry = SettingRegistry::new();
    let handler = handler_for(&registry, key)?;
    mutate_config_at(config_path, |config| handler.set(args, config))
}

pub fn unset_setting(config_path: &Path, key: &str) -> Result<String, SettingError> {
    let registry = SettingRegistry::new();
    let handler = handler_for(&registry, key)?;
    mutate_config_at(config_path, |config| Ok(handler.unset(config)))
}
