mod conversation;
mod request;

use std::path::PathBuf;

use super::App;
use crate::api::models::ConnectionStatus;
use crate::core::chat_request::{RequestOutcome, RequestParams};

pub use request::SubmitError;

pub enum AppAction {
    SubmitMessage { message: String },
    RequestFinished { request_id: u64, outcome: RequestOutcome },
    CancelRequest,
    ConnectionChecked { status: ConnectionStatus },
    NewSession,
    SwitchSession { id: String },
    DeleteSession { id: String },
    AttachFile { path: PathBuf },
    AttachImage { path: PathBuf },
    ClearAttachments,
    SetModel { model: String },
    SetTemperature { value: f64 },
    SetSystemPrompt { prompt: String },
    ExportActive { path: Option<PathBuf>, overwrite: bool },
    ShowSessions,
    ShowStatus,
}

pub enum AppCommand {
    SpawnRequest(RequestParams),
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitMessage { .. }
        | AppAction::RequestFinished { .. }
        | AppAction::CancelRequest
        | AppAction::ConnectionChecked { .. } => request::handle_request_action(app, action),

        AppAction::NewSession
        | AppAction::SwitchSession { .. }
        | AppAction::DeleteSession { .. }
        | AppAction::AttachFile { .. }
        | AppAction::AttachImage { .. }
        | AppAction::ClearAttachments
        | AppAction::SetModel { .. }
        | AppAction::SetTemperature { .. }
        | AppAction::SetSystemPrompt { .. }
        | AppAction::ExportActive { .. }
        | AppAction::ShowSessions
        | AppAction::ShowStatus => {
            conversation::handle_conversation_action(app, action);
            None
        }
    }
}
