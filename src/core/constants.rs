//! Shared constants used across the application

/// Label given to sessions until their first user turn names them.
pub const DEFAULT_SESSION_NAME: &str = "New Chat";

/// Session names are cut to this many characters of the first user message.
pub const SESSION_NAME_MAX_CHARS: usize = 40;

/// Per-file cap on inline text attachments, in characters.
pub const MAX_ATTACHMENT_CHARS: usize = 5000;

pub const ATTACHMENT_SECTION_HEADER: &str = "--- Attached Files ---";

pub const TRUNCATION_MARKER: &str = "... (truncated)";

/// Assistant text used when a successful reply carries no message content.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "No response";

/// Version tag written into the session file.
pub const SESSION_FILE_VERSION: u32 = 1;
