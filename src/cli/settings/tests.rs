use super::*;
use std::time::Duration;
use tempfile::TempDir;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn set_then_unset_round_trips_through_the_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");

    let message = set_setting(&path, "model", &args(&["mistral:7b"])).expect("set");
    assert_eq!(message, "✅ Set model to: mistral:7b");
    assert_eq!(
        Config::load_from_path(&path).expect("load").model.as_deref(),
        Some("mistral:7b")
    );

    unset_setting(&path, "model").expect("unset");
    let config = Config::load_from_path(&path).expect("load");
    assert_eq!(config.model, None);
    assert_eq!(config.effective_model(), "llama2");
}

#[test]
fn multi_word_values_are_joined() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");

    set_setting(&path, "system-prompt", &args(&["Answer", "in", "French."])).expect("set");
    assert_eq!(
        Config::load_from_path(&path)
            .expect("load")
            .system_prompt
            .as_deref(),
        Some("Answer in French.")
    );
}

#[test]
fn temperature_must_be_in_range() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");

    assert!(matches!(
        set_setting(&path, "temperature", &args(&["2.5"])),
        Err(SettingError::InvalidValue { .. })
    ));
    assert!(matches!(
        set_setting(&path, "temperature", &args(&["hot"])),
        Err(SettingError::InvalidValue { .. })
    ));
    assert!(!path.exists());

    set_setting(&path, "temperature", &args(&["1.5"])).expect("set");
    assert_eq!(
        Config::load_from_path(&path).expect("load").temperature,
        Some(1.5)
    );
}

#[test]
fn base_url_is_validated_and_normalized() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");

    assert!(set_setting(&path, "base-url", &args(&["localhost:11434"])).is_err());
    set_setting(&path, "base-url", &args(&["http://gpu-box:11434/"])).expect("set");
    assert_eq!(
        Config::load_from_path(&path)
            .expect("load")
            .base_url
            .as_deref(),
        Some("http://gpu-box:11434")
    );
}

#[test]
fn timeouts_accept_whole_seconds() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");

    set_setting(&path, "request-timeout", &args(&["300s"])).expect("set");
    assert!(set_setting(&path, "probe-timeout", &args(&["0"])).is_err());
    let config = Config::load_from_path(&path).expect("load");
    assert_eq!(config.request_timeout(), Duration::from_secs(300));
    assert_eq!(config.probe_timeout(), Duration::from_secs(2));
}

#[test]
fn unknown_key_and_missing_value_are_errors() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");

    assert!(matches!(
        set_setting(&path, "theme", &args(&["dark"])),
        Err(SettingError::UnknownKey(key)) if key == "theme"
    ));
    assert!(matches!(
        set_setting(&path, "model", &[]),
        Err(SettingError::MissingArgs { .. })
    ));
    assert!(matches!(
        unset_setting(&path, "nope"),
        Err(SettingError::UnknownKey(_))
    ));
}

#[test]
fn registry_covers_every_described_key() {
    let registry = SettingRegistry::new();
    let described: Vec<String> = Config::default()
        .describe()
        .iter()
        .filter_map(|line| line.trim().split(':').next().map(str::to_string))
        .collect();
    assert_eq!(described, registry.keys_display_order());
}
