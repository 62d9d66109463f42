use super::{App, AppAction};
use crate::core::config::data::path_display;

pub(super) fn handle_conversation_action(app: &mut App, action: AppAction) {
    match action {
        AppAction::NewSession => {
            app.new_session();
        }
        AppAction::SwitchSession { id } => {
            if let Err(err) = app.switch_session(&id) {
                app.presenter.show_warning(&err.to_string());
            }
        }
        AppAction::DeleteSession { id } => {
            if let Err(err) = app.delete_session(&id) {
                app.presenter.show_warning(&err.to_string());
            }
        }
        AppAction::AttachFile { path } => {
            if let Err(err) = app.attach_file(&path) {
                app.presenter.show_warning(&err.to_string());
            }
        }
        AppAction::AttachImage { path } => {
            if let Err(err) = app.attach_image(&path) {
                app.presenter.show_warning(&err.to_string());
            }
        }
        AppAction::ClearAttachments => app.clear_attachments(),
        AppAction::SetModel { model } => app.set_model(&model),
        AppAction::SetTemperature { value } => {
            app.set_temperature(value);
        }
        AppAction::SetSystemPrompt { prompt } => app.set_system_prompt(&prompt),
        AppAction::ExportActive { path, overwrite } => {
            match app.export_active(path, overwrite) {
                Ok(written) => app
                    .presenter
                    .set_status(&format!("Exported: {}", path_display(&written))),
                Err(err) => app.presenter.show_warning(&format!("Export error: {err}")),
            }
        }
        AppAction::ShowSessions => app.render_sessions(),
        AppAction::ShowStatus => {
            let status = app.status_line();
            app.presenter.set_status(&status);
        }
        _ => unreachable!("non-conversation action routed to conversation handler"),
    }
}
