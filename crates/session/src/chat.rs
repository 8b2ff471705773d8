//! Chat session model.

use ragdesk_client::SourceReference;
use serde::Serialize;
use std::fmt;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat bubble. Never edited after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Message history, the source panel, and the ask input state.
///
/// History is append-only. The source panel is replaced wholesale by every
/// answered question.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    messages: Vec<Message>,
    sources: Vec<SourceReference>,
    loading: bool,
    input_enabled: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            sources: Vec::new(),
            loading: false,
            input_enabled: true,
        }
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn sources(&self) -> &[SourceReference] {
        &self.sources
    }

    /// Whether the loading indicator is shown.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a question can be submitted.
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn replace_sources(&mut self, sources: Vec<SourceReference>) {
        self.sources = sources;
    }

    pub(crate) fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}
