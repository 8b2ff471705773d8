//! Command handlers for the Ragdesk CLI.

pub mod ask;
pub mod chat;
pub mod docs;
pub mod status;
pub mod upload;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use docs::{ChunksCommand, DocsCommand};
pub use status::StatusCommand;
pub use upload::UploadCommand;

use ragdesk_core::{AppError, AppResult};
use ragdesk_session::render::render_message;
use ragdesk_session::InteractionController;

/// Print chat messages appended since `printed`, advancing it.
pub(crate) fn print_new_messages(controller: &InteractionController, printed: &mut usize) {
    let messages = controller.state().chat.messages();
    for message in &messages[*printed..] {
        println!("{}", render_message(message));
    }
    *printed = messages.len();
}

pub(crate) fn to_json_string(value: &serde_json::Value) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Serialization(e.to_string()))
}
