use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{App, AppAction, AppCommand};
use crate::core::app::{InFlight, RequestPhase};
use crate::core::attachment::build_user_content;
use crate::core::chat_request::{RequestOutcome, RequestParams};
use crate::core::composer::build_request;
use crate::core::message::{TranscriptRole, Turn};

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// A reply is still pending.
    Busy,
    /// Nothing to send: blank message and no attachments.
    Empty,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Busy => write!(f, "Please wait for the current response to complete."),
            SubmitError::Empty => write!(f, "Type a message or attach a file first."),
        }
    }
}

impl std::error::Error for SubmitError {}

pub(super) fn handle_request_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitMessage { message } => match submit_message(app, &message) {
            Ok(params) => Some(AppCommand::SpawnRequest(params)),
            Err(SubmitError::Busy) => {
                app.presenter.show_warning(&SubmitError::Busy.to_string());
                None
            }
            Err(SubmitError::Empty) => None,
        },
        AppAction::RequestFinished {
            request_id,
            outcome,
        } => {
            finish_request(app, request_id, outcome);
            None
        }
        AppAction::CancelRequest => {
            match app.in_flight() {
                Some(in_flight) => {
                    in_flight.cancel_token.cancel();
                    app.presenter.set_status("Cancelling...");
                }
                None => app.presenter.set_status("No response in progress"),
            }
            None
        }
        AppAction::ConnectionChecked { status } => {
            app.presenter.set_connection(&status);
            None
        }
        _ => unreachable!("non-request action routed to request handler"),
    }
}

/// Record the user's turn and prepare the request for it. Nothing changes
/// when the message is rejected.
pub fn submit_message(app: &mut App, message: &str) -> Result<RequestParams, SubmitError> {
    if app.is_busy() {
        return Err(SubmitError::Busy);
    }
    let message = message.trim();
    if message.is_empty() && app.pending.is_empty() {
        return Err(SubmitError::Empty);
    }

    let (files, images) = app.pending.take();
    let content = build_user_content(message, &files);
    let index = app.active_index();
    let session_id = app.sessions[index].id.clone();
    app.sessions[index].append_turn(TranscriptRole::User, content, Some(images));
    app.persist();

    let request = build_request(
        &app.session.system_prompt,
        &app.sessions[index],
        &app.session.model,
        app.session.temperature,
    );
    let request_id = app.allocate_request_id();
    let cancel_token = CancellationToken::new();
    debug!(request_id, session = %session_id, "dispatching request");
    app.phase = RequestPhase::Sending(InFlight {
        request_id,
        session_id,
        cancel_token: cancel_token.clone(),
    });

    app.render_sessions();
    app.render_active();
    app.presenter.set_busy(true);
    app.presenter.set_status("Generating response...");

    Ok(RequestParams {
        client: app.session.client.clone(),
        url: app.session.chat_url(),
        request,
        timeout: app.session.request_timeout,
        cancel_token,
        request_id,
    })
}

fn outcome_turn(outcome: RequestOutcome) -> Turn {
    match outcome {
        RequestOutcome::Reply(content) => Turn::assistant(content),
        RequestOutcome::HttpError { status, body } if body.is_empty() => {
            Turn::notice(format!("Error: {status}"))
        }
        RequestOutcome::HttpError { status, body } => {
            Turn::notice(format!("Error: {status} - {body}"))
        }
        RequestOutcome::TransportError(description) => Turn::notice(format!("Error: {description}")),
        RequestOutcome::Cancelled => Turn::notice("Request cancelled"),
    }
}

/// Apply a worker's outcome. Outcomes for anything but the request in
/// flight are dropped, so the busy indicator clears exactly once.
pub fn finish_request(app: &mut App, request_id: u64, outcome: RequestOutcome) {
    let in_flight = match std::mem::take(&mut app.phase) {
        RequestPhase::Sending(in_flight) if in_flight.request_id == request_id => in_flight,
        other => {
            debug!(request_id, "ignoring outcome for a request that is not in flight");
            app.phase = other;
            return;
        }
    };

    let turn = outcome_turn(outcome);
    let failed = turn.role.is_notice();
    match app.session_by_id_mut(&in_flight.session_id) {
        Some(session) => session.push(turn),
        None => warn!(session = %in_flight.session_id, "reply arrived for a missing session"),
    }
    app.persist();

    if in_flight.session_id == app.active_id {
        app.render_active();
    }
    app.presenter.set_busy(false);
    app.presenter
        .set_status(if failed { "Request failed" } else { "Ready" });
}
