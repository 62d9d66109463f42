use crate::api::{ChatMessage, ChatOptions, ChatRequest};
use crate::core::message::Turn;
use crate::core::session::ChatSession;

fn to_api_message(turn: &Turn) -> Option<ChatMessage> {
    let role = turn.role.to_api_role()?;
    Some(ChatMessage {
        role: role.to_string(),
        content: turn.content.clone(),
        images: turn.images.clone(),
    })
}

/// Build the outbound chat request for `session`.
///
/// The system prompt always leads, followed by every replayable turn in
/// transcript order. Notices are left out.
pub fn build_request(
    system_prompt: &str,
    session: &ChatSession,
    model: &str,
    temperature: f64,
) -> ChatRequest {
    let mut messages = Vec::with_capacity(session.messages.len() + 1);
    messages.push(ChatMessage {
        role: "system".to_string(),
        content: system_prompt.to_string(),
        images: None,
    });
    messages.extend(session.messages.iter().filter_map(to_api_message));

    ChatRequest {
        model: model.to_string(),
        messages,
        stream: false,
        options: ChatOptions { temperature },
    }
}
