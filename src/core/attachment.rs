//! Turns file and image selections into transcript-ready payloads.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;

use crate::core::constants::{
    ATTACHMENT_SECTION_HEADER, MAX_ATTACHMENT_CHARS, TRUNCATION_MARKER,
};

/// A local file could not be opened or read.
#[derive(Debug)]
pub struct AttachmentReadError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl fmt::Display for AttachmentReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to read attachment {}: {}",
            self.path.display(),
            self.source
        )
    }
}

impl StdError for AttachmentReadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAttachment {
    pub name: String,
    pub content: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub name: String,
    pub data: String,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, AttachmentReadError> {
    fs::read(path).map_err(|source| AttachmentReadError {
        path: path.to_path_buf(),
        source,
    })
}

/// Cut `text` down to at most `max_chars` characters.
/// Returns whether anything was removed.
fn truncate_chars(text: &mut String, max_chars: usize) -> bool {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            text.truncate(byte_index);
            true
        }
        None => false,
    }
}

pub fn read_text_attachment(path: &Path) -> Result<TextAttachment, AttachmentReadError> {
    let bytes = read_bytes(path)?;
    let mut content = String::from_utf8_lossy(&bytes).into_owned();
    let truncated = truncate_chars(&mut content, MAX_ATTACHMENT_CHARS);
    Ok(TextAttachment {
        name: display_name(path),
        content,
        truncated,
    })
}

pub fn read_image_attachment(path: &Path) -> Result<ImageAttachment, AttachmentReadError> {
    let bytes = read_bytes(path)?;
    Ok(ImageAttachment {
        name: display_name(path),
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
    })
}

/// Fold text attachments into the literal message.
pub fn build_user_content(message: &str, files: &[TextAttachment]) -> String {
    if files.is_empty() {
        return message.to_string();
    }

    let mut content = String::with_capacity(
        message.len() + files.iter().map(|f| f.content.len() + 64).sum::<usize>(),
    );
    content.push_str(message);
    content.push_str("\n\n");
    content.push_str(ATTACHMENT_SECTION_HEADER);
    content.push('\n');
    for file in files {
        content.push_str(&format!("\nFile: {}\nContent:\n{}\n", file.name, file.content));
        if file.truncated {
            content.push_str(TRUNCATION_MARKER);
            content.push('\n');
        }
    }
    content
}

/// The literal message part of a user turn built by [`build_user_content`].
pub fn literal_message(content: &str) -> &str {
    let delimiter = format!("\n\n{ATTACHMENT_SECTION_HEADER}\n");
    match content.find(&delimiter) {
        Some(index) => &content[..index],
        None => content,
    }
}

/// Files and images waiting to be folded into the next user turn.
#[derive(Debug, Clone, Default)]
pub struct PendingAttachments {
    pub files: Vec<TextAttachment>,
    pub images: Vec<ImageAttachment>,
}

impl PendingAttachments {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.images.is_empty()
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.images.clear();
    }

    /// Take everything, leaving the queue empty.
    pub fn take(&mut self) -> (Vec<TextAttachment>, Vec<String>) {
        let files = std::mem::take(&mut self.files);
        let images = std::mem::take(&mut self.images)
            .into_iter()
            .map(|image| image.data)
            .collect();
        (files, images)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} file(s), {} image(s)",
            self.files.len(),
            self.images.len()
        )
    }
}
