//! Document browser model.
//!
//! Holds the ingested document list and, at most, one expanded chunk
//! listing. The two are refreshed independently.

use ragdesk_client::{DocumentChunk, DocumentSummary};
use ragdesk_core::AppResult;
use serde::Serialize;

/// State of the document list view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DocumentListView {
    NotLoaded,
    Loading,
    Loaded(Vec<DocumentSummary>),
    Error,
}

/// Content of the chunk viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChunkContent {
    Loading,
    Loaded(Vec<DocumentChunk>),
    Error,
}

/// The expanded chunk listing for the selected document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkViewer {
    pub document: String,
    pub content: ChunkContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentBrowser {
    list: DocumentListView,
    viewer: Option<ChunkViewer>,
    /// Bumped on every selection; tags chunk requests.
    generation: u64,
}

impl Default for DocumentBrowser {
    fn default() -> Self {
        Self {
            list: DocumentListView::NotLoaded,
            viewer: None,
            generation: 0,
        }
    }
}

impl DocumentBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &DocumentListView {
        &self.list
    }

    /// The chunk viewer, once any document has been selected.
    pub fn viewer(&self) -> Option<&ChunkViewer> {
        self.viewer.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn begin_list_refresh(&mut self) {
        self.list = DocumentListView::Loading;
    }

    /// Replace the whole document list with a listing result.
    pub fn apply_list(&mut self, result: AppResult<Vec<DocumentSummary>>) {
        self.list = match result {
            Ok(documents) => DocumentListView::Loaded(documents),
            Err(e) => {
                tracing::warn!("Document listing failed: {}", e);
                DocumentListView::Error
            }
        };
    }

    /// Reveal the viewer for `document` and return the generation the
    /// chunk request must carry.
    pub fn select(&mut self, document: &str) -> u64 {
        self.generation += 1;
        self.viewer = Some(ChunkViewer {
            document: document.to_string(),
            content: ChunkContent::Loading,
        });
        self.generation
    }

    /// Whether a chunk request tagged `(document, generation)` still matches
    /// the selected document.
    pub fn is_current(&self, document: &str, generation: u64) -> bool {
        generation == self.generation
            && self
                .viewer
                .as_ref()
                .is_some_and(|viewer| viewer.document == document)
    }

    /// Apply a chunk listing if it still belongs to the current selection.
    ///
    /// Returns `false` when the response is stale and was discarded.
    pub fn apply_chunks(
        &mut self,
        document: &str,
        generation: u64,
        result: AppResult<Vec<DocumentChunk>>,
    ) -> bool {
        if !self.is_current(document, generation) {
            tracing::debug!(
                "Discarding chunks for {} (generation {}, current {})",
                document,
                generation,
                self.generation
            );
            return false;
        }
        let Some(viewer) = self.viewer.as_mut() else {
            return false;
        };

        viewer.content = match result {
            Ok(chunks) => ChunkContent::Loaded(chunks),
            Err(e) => {
                tracing::warn!("Loading chunks for {} failed: {}", document, e);
                ChunkContent::Error
            }
        };
        true
    }
}
