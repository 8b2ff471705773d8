//! Chat session, document browser and the interaction controller.
//!
//! User actions go through [`SessionState::handle_action`], which updates
//! the models and returns the backend [`Request`]s to issue. The
//! [`InteractionController`] runs those requests as tokio tasks and feeds
//! each [`Completion`] back through [`SessionState::handle_completion`] in
//! the order responses arrive. Views are produced by the pure functions in
//! [`render`].

pub mod browser;
pub mod chat;
pub mod controller;
pub mod render;
pub mod state;
pub mod status;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use browser::{ChunkContent, ChunkViewer, DocumentBrowser, DocumentListView};
pub use chat::{ChatSession, Message, Role};
pub use controller::{CompletionKind, InteractionController};
pub use state::{BusyPolicy, Completion, Request, SessionState, UserAction};
pub use status::BackendStatus;
