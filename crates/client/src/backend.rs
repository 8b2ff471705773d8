//! Backend abstraction.
//!
//! The interaction controller only talks to the backend through this trait,
//! which keeps it testable against scripted in-memory backends.

use crate::types::{AskResponse, ChunkListing, DocumentSummary, HealthStatus, UploadReceipt};
use ragdesk_core::AppResult;

/// Operations offered by the RAG backend.
///
/// Each method issues exactly one request when called. Implementations hold
/// no request queue and never retry; any error is reported once to the
/// caller.
#[async_trait::async_trait]
pub trait RagBackend: Send + Sync {
    /// Base address requests are sent to.
    fn base_url(&self) -> &str;

    /// Probe the service root. Never fails; an unreachable or unhealthy
    /// backend is reported as [`HealthStatus::Unreachable`].
    async fn check_health(&self) -> HealthStatus;

    /// Ask a question against the knowledge base.
    async fn ask(&self, question: &str) -> AppResult<AskResponse>;

    /// Upload a source document for ingestion.
    async fn upload(&self, file: Vec<u8>, filename: &str) -> AppResult<UploadReceipt>;

    /// List every ingested document.
    async fn list_documents(&self) -> AppResult<Vec<DocumentSummary>>;

    /// Fetch the stored chunks of one document.
    async fn get_document_chunks(&self, name: &str) -> AppResult<ChunkListing>;
}
