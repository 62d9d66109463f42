//! Interactive loop: reads lines from stdin, turns them into app actions,
//! and feeds worker outcomes back into the app.

use std::error::Error;
use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::models::check_connection;
use crate::commands::{process_input, CommandResult};
use crate::core::app::{apply_actions, App, AppAction, AppCommand};
use crate::core::chat_request::ChatRequestService;

#[derive(Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Line-level state the loop keeps between reads.
#[derive(Default)]
pub struct LineState {
    pending_delete: Option<String>,
}

impl LineState {
    pub fn awaiting_confirmation(&self) -> bool {
        self.pending_delete.is_some()
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

pub fn dispatch(
    app: &mut App,
    service: &ChatRequestService,
    actions: impl IntoIterator<Item = AppAction>,
) {
    for cmd in apply_actions(app, actions) {
        match cmd {
            AppCommand::SpawnRequest(params) => service.spawn_request(params),
        }
    }
}

/// Handle one line of user input.
pub fn handle_line(
    app: &mut App,
    service: &ChatRequestService,
    state: &mut LineState,
    line: &str,
) -> LoopControl {
    if let Some(id) = state.pending_delete.take() {
        if is_affirmative(line) {
            dispatch(app, service, [AppAction::DeleteSession { id }]);
        } else {
            println!("Kept chat.");
        }
        return LoopControl::Continue;
    }

    match process_input(app, line) {
        CommandResult::ProcessAsMessage(message) => {
            dispatch(app, service, [AppAction::SubmitMessage { message }]);
        }
        CommandResult::Actions(actions) => dispatch(app, service, actions),
        CommandResult::Print(text) => println!("{text}"),
        CommandResult::ConfirmDelete { id, name } => {
            prompt(&format!("Delete chat '{name}'? This cannot be undone. [y/N] "));
            state.pending_delete = Some(id);
        }
        CommandResult::Quit => return LoopControl::Quit,
    }
    LoopControl::Continue
}

/// Decode one raw input line. Invalid UTF-8 is replaced rather than
/// rejected, matching how attachments are read.
fn decode_line(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    text.strip_suffix('\r').unwrap_or(&text).to_string()
}

pub async fn run_chat(mut app: App) -> Result<(), Box<dyn Error>> {
    println!("chatdesk - talking to {}", app.session.base_url);
    println!("Type a message and press Enter. /help lists commands.");
    run_chat_with_input(&mut app, BufReader::new(tokio::io::stdin())).await;
    println!("Bye.");
    Ok(())
}

/// Drive `app` from `input` until it ends or the user quits. Any request
/// still in flight is cancelled on the way out.
pub async fn run_chat_with_input<R>(app: &mut App, input: R)
where
    R: AsyncBufRead + Unpin,
{
    let (service, mut outcome_rx) = ChatRequestService::new();
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();

    {
        let client = app.session.client.clone();
        let base_url = app.session.base_url.clone();
        let timeout = app.session.probe_timeout;
        tokio::spawn(async move {
            let status = check_connection(&client, &base_url, timeout).await;
            let _ = action_tx.send(AppAction::ConnectionChecked { status });
        });
    }

    app.refresh();

    let mut lines = input.split(b'\n');
    let mut state = LineState::default();

    loop {
        tokio::select! {
            segment = lines.next_segment() => {
                let raw = match segment {
                    Ok(Some(raw)) => raw,
                    Ok(None) => {
                        debug!("input closed");
                        break;
                    }
                    Err(err) => {
                        warn!(error = %err, "reading input failed");
                        break;
                    }
                };
                let line = decode_line(&raw);
                if handle_line(app, &service, &mut state, &line) == LoopControl::Quit {
                    break;
                }
            }
            Some((outcome, request_id)) = outcome_rx.recv() => {
                dispatch(app, &service, [AppAction::RequestFinished { request_id, outcome }]);
            }
            Some(action) = action_rx.recv() => {
                dispatch(app, &service, [action]);
            }
        }
    }

    if let Some(in_flight) = app.in_flight() {
        in_flight.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{create_test_app, PresenterEvent};
    use tempfile::TempDir;

    #[test]
    fn affirmative_answers() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative(" YES \n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("yep"));
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let dir = TempDir::new().expect("tempdir");
        let (mut app, _presenter) = create_test_app(dir.path());
        let (service, _rx) = ChatRequestService::new();
        let mut state = LineState::default();
        let first = app.active_id().to_string();
        app.new_session();

        handle_line(&mut app, &service, &mut state, "/delete 2");
        assert!(state.awaiting_confirmation());
        handle_line(&mut app, &service, &mut state, "n");
        assert!(!state.awaiting_confirmation());
        assert!(app.session_by_id(&first).is_some());

        handle_line(&mut app, &service, &mut state, "/delete 2");
        handle_line(&mut app, &service, &mut state, "y");
        assert!(app.session_by_id(&first).is_none());
        assert_eq!(app.sessions().len(), 1);
    }

    #[tokio::test]
    async fn message_lines_start_a_request() {
        let dir = TempDir::new().expect("tempdir");
        let (mut app, presenter) = create_test_app(dir.path());
        let (service, _rx) = ChatRequestService::new();
        let mut state = LineState::default();

        let control = handle_line(&mut app, &service, &mut state, "Hello");
        assert_eq!(control, LoopControl::Continue);
        assert!(app.is_busy());
        assert_eq!(presenter.busy_changes(), vec![true]);
        assert_eq!(app.active_session().messages[0].content, "Hello");
    }

    #[tokio::test]
    async fn outcomes_from_the_worker_channel_finish_the_request() {
        let dir = TempDir::new().expect("tempdir");
        let (mut app, _presenter) = create_test_app(dir.path());
        let (service, mut rx) = ChatRequestService::new();
        let mut state = LineState::default();

        handle_line(&mut app, &service, &mut state, "Hello");
        let request_id = app.in_flight().map(|f| f.request_id).expect("in flight");
        app.in_flight().expect("in flight").cancel_token.cancel();

        let (outcome, id) = rx.recv().await.expect("outcome");
        assert_eq!(id, request_id);
        dispatch(
            &mut app,
            &service,
            [AppAction::RequestFinished {
                request_id: id,
                outcome,
            }],
        );

        assert!(!app.is_busy());
        assert_eq!(
            app.active_session().messages[1].content,
            "Request cancelled"
        );
    }

    #[test]
    fn input_lines_decode_lossily() {
        assert_eq!(decode_line(b"caf\xe9"), "caf\u{FFFD}");
        assert_eq!(decode_line(b"hello\r"), "hello");
    }

    #[tokio::test]
    async fn invalid_utf8_input_does_not_end_the_loop() {
        let dir = TempDir::new().expect("tempdir");
        let (mut app, presenter) = create_test_app(dir.path());
        let input: &[u8] = b"caf\xe9\n/list\n/quit\n";

        run_chat_with_input(&mut app, input).await;

        assert_eq!(app.active_session().messages[0].content, "caf\u{FFFD}");
        let listings = presenter
            .events()
            .iter()
            .filter(|event| matches!(event, PresenterEvent::SessionList { .. }))
            .count();
        // refresh, the submit, and /list
        assert!(listings >= 3);
        assert!(app
            .in_flight()
            .map_or(true, |in_flight| in_flight.cancel_token.is_cancelled()));
    }

    #[test]
    fn quit_stops_the_loop() {
        let dir = TempDir::new().expect("tempdir");
        let (mut app, _presenter) = create_test_app(dir.path());
        let (service, _rx) = ChatRequestService::new();
        let mut state = LineState::default();

        assert_eq!(
            handle_line(&mut app, &service, &mut state, "/quit"),
            LoopControl::Quit
        );
    }
}
