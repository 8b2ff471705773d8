//! Document browser command handlers.

use clap::Args;
use ragdesk_client::RagBackend;
use ragdesk_core::AppResult;
use ragdesk_session::render::{
    render_chunk_viewer, render_document_list, CHUNKS_ERROR_PLACEHOLDER,
};
use ragdesk_session::{
    BusyPolicy, ChunkContent, DocumentListView, InteractionController, UserAction,
};
use std::sync::Arc;

/// List ingested documents
#[derive(Args, Debug)]
pub struct DocsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl DocsCommand {
    pub async fn execute(&self, backend: Arc<dyn RagBackend>, policy: BusyPolicy) -> AppResult<()> {
        tracing::info!("Executing docs command");

        let mut controller = InteractionController::new(backend, policy);
        controller.dispatch(UserAction::RefreshDocuments);
        controller.settle().await;

        let view = controller.state().browser.list();
        match (self.json, view) {
            (true, DocumentListView::Loaded(documents)) => {
                let output = serde_json::json!({ "documents": documents });
                println!("{}", super::to_json_string(&output)?);
            }
            (true, _) => {
                let output = serde_json::json!({ "error": render_document_list(view) });
                println!("{}", super::to_json_string(&output)?);
            }
            (false, DocumentListView::Loaded(documents)) if documents.is_empty() => {
                tracing::info!("No documents ingested yet");
            }
            (false, _) => println!("{}", render_document_list(view)),
        }

        Ok(())
    }
}

/// Show the stored chunks of one document
#[derive(Args, Debug)]
pub struct ChunksCommand {
    /// Document name as listed by `docs`
    pub document: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChunksCommand {
    pub async fn execute(&self, backend: Arc<dyn RagBackend>, policy: BusyPolicy) -> AppResult<()> {
        tracing::info!("Executing chunks command for '{}'", self.document);

        let mut controller = InteractionController::new(backend, policy);
        controller.dispatch(UserAction::SelectDocument(self.document.clone()));
        controller.settle().await;

        let viewer = controller.state().browser.viewer();
        if self.json {
            let output = match viewer.map(|v| &v.content) {
                Some(ChunkContent::Loaded(chunks)) => serde_json::json!({
                    "document": self.document,
                    "chunks": chunks,
                }),
                _ => serde_json::json!({
                    "document": self.document,
                    "error": CHUNKS_ERROR_PLACEHOLDER,
                }),
            };
            println!("{}", super::to_json_string(&output)?);
        } else {
            println!("{}", render_chunk_viewer(viewer));
        }

        Ok(())
    }
}
