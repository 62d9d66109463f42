use serde::{Deserialize, Serialize};

pub const CHAT_ENDPOINT: &str = "api/chat";

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatOptions {
    pub temperature: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub options: ChatOptions,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub message: Option<ChatResponseMessage>,
}

impl ChatResponse {
    pub fn into_content(self) -> Option<String> {
        self.message.and_then(|message| message.content)
    }
}

#[derive(Debug, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub modified_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

pub mod models;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_wire_shape() {
        let request = ChatRequest {
            model: "llava".into(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: "Be brief.".into(),
                    images: None,
                },
                ChatMessage {
                    role: "user".into(),
                    content: "What is this?".into(),
                    images: Some(vec!["aGk=".into()]),
                },
            ],
            stream: false,
            options: ChatOptions { temperature: 0.5 },
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "model": "llava",
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "What is this?", "images": ["aGk="]}
                ],
                "stream": false,
                "options": {"temperature": 0.5}
            })
        );
    }

    #[test]
    fn response_content_is_optional() {
        let full: ChatResponse =
            serde_json::from_str(r#"{"message":{"role":"assistant","content":"Hello!"},"done":true}"#)
                .expect("parse");
        assert_eq!(full.into_content().as_deref(), Some("Hello!"));

        let missing: ChatResponse = serde_json::from_str(r#"{"done":true}"#).expect("parse");
        assert_eq!(missing.into_content(), None);
    }
}
