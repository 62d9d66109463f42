use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TranscriptRole {
    System,
    User,
    Assistant,
    /// Locally generated error record. Shown in the transcript, never sent
    /// back to the chat service.
    Notice,
}

/// One message within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TranscriptRole,
    pub content: String,
    /// Base64 image payloads. Present only on turns that carried images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl TranscriptRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptRole::System => "system",
            TranscriptRole::User => "user",
            TranscriptRole::Assistant => "assistant",
            TranscriptRole::Notice => "app/notice",
        }
    }

    /// Role name used on the wire, or `None` for turns that are never
    /// replayed to the service.
    pub fn to_api_role(self) -> Option<&'static str> {
        match self {
            TranscriptRole::System => Some("system"),
            TranscriptRole::User => Some("user"),
            TranscriptRole::Assistant => Some("assistant"),
            TranscriptRole::Notice => None,
        }
    }

    /// Upper-case label used in plain-text exports.
    pub fn export_label(self) -> &'static str {
        match self {
            TranscriptRole::User => "USER",
            TranscriptRole::Assistant => "ASSISTANT",
            TranscriptRole::System | TranscriptRole::Notice => "SYSTEM",
        }
    }

    pub fn is_user(self) -> bool {
        self == TranscriptRole::User
    }

    pub fn is_notice(self) -> bool {
        self == TranscriptRole::Notice
    }
}

impl AsRef<str> for TranscriptRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<&str> for TranscriptRole {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl TryFrom<&str> for TranscriptRole {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "system" => Ok(TranscriptRole::System),
            "user" => Ok(TranscriptRole::User),
            "assistant" => Ok(TranscriptRole::Assistant),
            "app/notice" => Ok(TranscriptRole::Notice),
            _ => Err(format!("invalid transcript role: {value}")),
        }
    }
}

impl TryFrom<String> for TranscriptRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<TranscriptRole> for String {
    fn from(value: TranscriptRole) -> Self {
        value.as_str().to_string()
    }
}

impl Turn {
    pub fn new(role: TranscriptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            images: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::Assistant, content)
    }

    pub fn notice(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::Notice, content)
    }

    /// Attach image payloads. An empty list leaves the field absent.
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = if images.is_empty() {
            None
        } else {
            Some(images)
        };
        self
    }

    pub fn has_images(&self) -> bool {
        self.images.is_some()
    }
}
