use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::{ChatRequest, ChatResponse};
use crate::core::constants::EMPTY_REPLY_PLACEHOLDER;

/// How an outbound chat request ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    Reply(String),
    /// The server answered with a non-success status.
    HttpError { status: u16, body: String },
    /// Connection failure, timeout, or an unreadable success body.
    TransportError(String),
    Cancelled,
}

pub struct RequestParams {
    pub client: reqwest::Client,
    pub url: String,
    pub request: ChatRequest,
    pub timeout: Duration,
    pub cancel_token: CancellationToken,
    pub request_id: u64,
}

fn describe_transport_error(err: &reqwest::Error, timeout: Duration) -> String {
    if err.is_timeout() {
        format!("request timed out after {}s", timeout.as_secs())
    } else if err.is_connect() {
        format!("could not connect to the server ({err})")
    } else {
        err.to_string()
    }
}

fn parse_reply(body: &str) -> RequestOutcome {
    match serde_json::from_str::<ChatResponse>(body) {
        Ok(response) => RequestOutcome::Reply(
            response
                .into_content()
                .unwrap_or_else(|| EMPTY_REPLY_PLACEHOLDER.to_string()),
        ),
        Err(err) => RequestOutcome::TransportError(format!("invalid response from server: {err}")),
    }
}

async fn perform(
    client: &reqwest::Client,
    url: &str,
    request: &ChatRequest,
    timeout: Duration,
) -> RequestOutcome {
    let response = match client.post(url).timeout(timeout).json(request).send().await {
        Ok(response) => response,
        Err(err) => return RequestOutcome::TransportError(describe_transport_error(&err, timeout)),
    };

    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(err) if status.is_success() => {
            return RequestOutcome::TransportError(describe_transport_error(&err, timeout))
        }
        Err(_) => "<no body>".to_string(),
    };

    if status.is_success() {
        parse_reply(&body)
    } else {
        RequestOutcome::HttpError {
            status: status.as_u16(),
            body: body.trim().to_string(),
        }
    }
}

/// Run one request to completion, or until `cancel_token` fires.
pub async fn execute_request(params: RequestParams) -> RequestOutcome {
    let RequestParams {
        client,
        url,
        request,
        timeout,
        cancel_token,
        request_id,
    } = params;

    debug!(request_id, %url, model = %request.model, turns = request.messages.len(), "sending chat request");
    let outcome = tokio::select! {
        outcome = perform(&client, &url, &request, timeout) => outcome,
        _ = cancel_token.cancelled() => RequestOutcome::Cancelled,
    };
    debug!(request_id, ?outcome, "chat request finished");
    outcome
}

/// Runs chat requests off the interactive task and hands each outcome back
/// over a channel, tagged with its request id.
#[derive(Clone)]
pub struct ChatRequestService {
    tx: mpsc::UnboundedSender<(RequestOutcome, u64)>,
}

impl ChatRequestService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(RequestOutcome, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_request(&self, params: RequestParams) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let request_id = params.request_id;
            let outcome = execute_request(params).await;
            let _ = tx.send((outcome, request_id));
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, outcome: RequestOutcome, request_id: u64) {
        let _ = self.tx.send((outcome, request_id));
    }
}
