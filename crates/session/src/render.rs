//! Text rendering of session snapshots.
//!
//! Every function is pure: the same snapshot always renders to the same
//! text, so re-rendering after an identical refresh changes nothing.

use crate::browser::{ChunkContent, ChunkViewer, DocumentListView};
use crate::chat::{Message, Role};
use crate::state::SessionState;
use crate::status::BackendStatus;
use ragdesk_client::{DocumentChunk, DocumentSummary, SourceReference};

pub const LOADING_PLACEHOLDER: &str = "Loading...";
pub const DOCUMENTS_ERROR_PLACEHOLDER: &str = "Error loading documents.";
pub const CHUNKS_ERROR_PLACEHOLDER: &str = "Error loading chunks.";
pub const THINKING_INDICATOR: &str = "Thinking...";

pub fn render_status(status: BackendStatus) -> String {
    status.label().to_string()
}

pub fn render_message(message: &Message) -> String {
    let label = match message.role {
        Role::User => "you",
        Role::Assistant => "rag",
    };
    format!("[{}] {}", label, message.text)
}

pub fn render_messages(messages: &[Message]) -> String {
    messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One card per source: position, source document, text.
pub fn render_sources(sources: &[SourceReference]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            format!(
                "Source {}\n{}\n\n{}",
                i + 1,
                source.source_name(),
                source.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_document_item(document: &DocumentSummary) -> String {
    format!("{}\n  {} chunks", document.name, document.chunk_count)
}

pub fn render_document_list(view: &DocumentListView) -> String {
    match view {
        DocumentListView::NotLoaded => String::new(),
        DocumentListView::Loading => LOADING_PLACEHOLDER.to_string(),
        DocumentListView::Error => DOCUMENTS_ERROR_PLACEHOLDER.to_string(),
        DocumentListView::Loaded(documents) => documents
            .iter()
            .map(render_document_item)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn render_chunk(chunk: &DocumentChunk) -> String {
    let metadata = serde_json::Value::Object(chunk.metadata.clone());
    format!(
        "ID: {}\n\nText:\n{}\n\nMetadata:\n{}",
        chunk.id, chunk.text, metadata
    )
}

/// Renders nothing until a document has been selected.
pub fn render_chunk_viewer(viewer: Option<&ChunkViewer>) -> String {
    let Some(viewer) = viewer else {
        return String::new();
    };

    let body = match &viewer.content {
        ChunkContent::Loading => LOADING_PLACEHOLDER.to_string(),
        ChunkContent::Error => CHUNKS_ERROR_PLACEHOLDER.to_string(),
        ChunkContent::Loaded(chunks) => chunks
            .iter()
            .map(render_chunk)
            .collect::<Vec<_>>()
            .join("\n\n"),
    };

    format!("Chunks for: {}\n{}", viewer.document, body)
}

/// Full view of a snapshot, section by section.
pub fn render_snapshot(state: &SessionState) -> String {
    let mut sections = vec![
        format!("== Status ==\n{}", render_status(state.status)),
        format!("== Chat ==\n{}", render_messages(state.chat.messages())),
    ];

    if state.chat.is_loading() {
        sections.push(THINKING_INDICATOR.to_string());
    }

    sections.push(format!(
        "== Sources ==\n{}",
        render_sources(state.chat.sources())
    ));
    sections.push(format!(
        "== Documents ==\n{}",
        render_document_list(state.browser.list())
    ));

    if state.browser.viewer().is_some() {
        sections.push(render_chunk_viewer(state.browser.viewer()));
    }

    sections.join("\n\n")
}
