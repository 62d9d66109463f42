use crate::core::config::data::{path_display, Config};

impl Config {
    /// Effective values, marking the ones that come from defaults.
    pub fn describe(&self) -> Vec<String> {
        fn line(key: &str, value: impl std::fmt::Display, is_set: bool) -> String {
            if is_set {
                format!("  {key}: {value}")
            } else {
                format!("  {key}: {value} (default)")
            }
        }

        let prompt = self.effective_system_prompt().replace('\n', " ");
        vec![
            line("base-url", self.effective_base_url(), self.base_url.is_some()),
            line("model", self.effective_model(), self.model.is_some()),
            line(
                "vision-model",
                self.effective_vision_model(),
                self.vision_model.is_some(),
            ),
            line(
                "temperature",
                format!("{:.1}", self.effective_temperature()),
                self.temperature.is_some(),
            ),
            line("system-prompt", prompt, self.system_prompt.is_some()),
            line(
                "request-timeout",
                format!("{}s", self.request_timeout().as_secs()),
                self.request_timeout_secs.is_some(),
            ),
            line(
                "probe-timeout",
                format!("{}s", self.probe_timeout().as_secs()),
                self.probe_timeout_secs.is_some(),
            ),
            line(
                "sessions-file",
                path_display(self.effective_sessions_file()),
                self.sessions_file.is_some(),
            ),
        ]
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        for line in self.describe() {
            println!("{line}");
        }
    }
}
