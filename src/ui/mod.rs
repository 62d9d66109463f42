//! Terminal front end for interactive chat sessions.
//!
//! - [`chat_loop`]: the interaction loop that dispatches user input to
//!   [`crate::commands`] and hands requests to
//!   [`crate::core::chat_request`].
//! - [`terminal`]: a [`crate::core::app::Presenter`] that prints to any
//!   writer.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns domain logic and backend coordination.

pub mod chat_loop;
pub mod terminal;
