mod registry;

#[cfg(test)]
mod tests;

pub use registry::{all_commands, CommandInvocation};

use std::path::PathBuf;

use directories::BaseDirs;

use crate::core::app::{App, AppAction};

pub enum CommandResult {
    /// Not a command; send the line as a chat message.
    ProcessAsMessage(String),
    Actions(Vec<AppAction>),
    /// Local output only.
    Print(String),
    /// Ask before deleting.
    ConfirmDelete { id: String, name: String },
    Quit,
}

impl CommandResult {
    fn action(action: AppAction) -> Self {
        CommandResult::Actions(vec![action])
    }
}

pub fn process_input(app: &App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = registry::find_command(command_name) {
        let invocation = CommandInvocation {
            input: trimmed,
            args,
        };
        (command.handler)(app, invocation)
    } else {
        CommandResult::ProcessAsMessage(input.to_string())
    }
}

pub fn help_text() -> String {
    let width = all_commands()
        .iter()
        .map(|command| command.usage.len())
        .max()
        .unwrap_or(0);
    let mut text = String::from("Commands:\n");
    for command in all_commands() {
        text.push_str(&format!("  {:width$}  {}\n", command.usage, command.help));
    }
    text.push_str("Anything else is sent to the model.");
    text
}

fn usage(invocation: &CommandInvocation<'_>) -> CommandResult {
    let name = invocation.input[1..]
        .split_whitespace()
        .next()
        .unwrap_or_default();
    match registry::find_command(name) {
        Some(command) => CommandResult::Print(format!("Usage: {}", command.usage)),
        None => CommandResult::Print(help_text()),
    }
}

/// Strip matching quotes and expand a leading `~`.
pub(crate) fn expand_path(raw: &str) -> PathBuf {
    let raw = raw.trim();
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(raw);

    if let Some(rest) = unquoted.strip_prefix("~/") {
        if let Some(dirs) = BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(unquoted)
}

fn session_not_found(reference: &str) -> CommandResult {
    CommandResult::Print(format!(
        "No chat matches '{reference}'. Use /list to see chat numbers."
    ))
}

pub(super) fn handle_help(_app: &App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Print(help_text())
}

pub(super) fn handle_new(_app: &App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::action(AppAction::NewSession)
}

pub(super) fn handle_list(_app: &App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::action(AppAction::ShowSessions)
}

pub(super) fn handle_switch(app: &App, invocation: CommandInvocation<'_>) -> CommandResult {
    if !invocation.has_args() {
        return usage(&invocation);
    }
    match app.resolve_session_ref(invocation.args) {
        Some(id) => CommandResult::action(AppAction::SwitchSession { id }),
        None => session_not_found(invocation.args),
    }
}

pub(super) fn handle_delete(app: &App, invocation: CommandInvocation<'_>) -> CommandResult {
    let id = if invocation.has_args() {
        match app.resolve_session_ref(invocation.args) {
            Some(id) => id,
            None => return session_not_found(invocation.args),
        }
    } else {
        app.active_id().to_string()
    };
    let name = app
        .session_by_id(&id)
        .map(|session| session.name.clone())
        .unwrap_or_default();
    CommandResult::ConfirmDelete { id, name }
}

pub(super) fn handle_attach(_app: &App, invocation: CommandInvocation<'_>) -> CommandResult {
    if !invocation.has_args() {
        return usage(&invocation);
    }
    CommandResult::action(AppAction::AttachFile {
        path: expand_path(invocation.args),
    })
}

pub(super) fn handle_image(_app: &App, invocation: CommandInvocation<'_>) -> CommandResult {
    if !invocation.has_args() {
        return usage(&invocation);
    }
    CommandResult::action(AppAction::AttachImage {
        path: expand_path(invocation.args),
    })
}

pub(super) fn handle_clear_attachments(
    _app: &App,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::action(AppAction::ClearAttachments)
}

pub(super) fn handle_model(app: &App, invocation: CommandInvocation<'_>) -> CommandResult {
    if !invocation.has_args() {
        return CommandResult::Print(format!("Current model: {}", app.session.model));
    }
    CommandResult::action(AppAction::SetModel {
        model: invocation.args.to_string(),
    })
}

pub(super) fn handle_temp(app: &App, invocation: CommandInvocation<'_>) -> CommandResult {
    if !invocation.has_args() {
        return CommandResult::Print(format!(
            "Current temperature: {:.1}",
            app.session.temperature
        ));
    }
    match invocation.args.parse::<f64>() {
        Ok(value) if value.is_finite() => CommandResult::action(AppAction::SetTemperature { value }),
        _ => usage(&invocation),
    }
}

pub(super) fn handle_system(app: &App, invocation: CommandInvocation<'_>) -> CommandResult {
    if !invocation.has_args() {
        return CommandResult::Print(format!("System prompt: {}", app.session.system_prompt));
    }
    CommandResult::action(AppAction::SetSystemPrompt {
        prompt: invocation.args.to_string(),
    })
}

pub(super) fn handle_export(_app: &App, invocation: CommandInvocation<'_>) -> CommandResult {
    let (overwrite, rest) = match invocation.args.strip_prefix("--force") {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => (true, rest.trim()),
        _ => (false, invocation.args),
    };
    let path = (!rest.is_empty()).then(|| expand_path(rest));
    CommandResult::action(AppAction::ExportActive { path, overwrite })
}

pub(super) fn handle_cancel(_app: &App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::action(AppAction::CancelRequest)
}

pub(super) fn handle_status(_app: &App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::action(AppAction::ShowStatus)
}

pub(super) fn handle_quit(_app: &App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}
