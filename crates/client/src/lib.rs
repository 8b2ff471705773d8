//! Transport client for the Ragdesk RAG backend.
//!
//! Wraps the five backend operations (health, ask, upload, list documents,
//! document chunks) behind the [`RagBackend`] trait. Every call is a single
//! request/response round trip; nothing is queued or retried.
//!
//! # Example
//! ```no_run
//! use ragdesk_client::{create_backend, HealthStatus};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = create_backend("http://127.0.0.1:8000")?;
//! if backend.check_health().await == HealthStatus::Ok {
//!     let reply = backend.ask("What is the retention policy?").await?;
//!     println!("{:?}", reply.answer);
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod factory;
pub mod http;
pub mod types;

// Re-export main types
pub use backend::RagBackend;
pub use factory::create_backend;
pub use http::HttpBackend;
pub use types::{
    AskResponse, ChunkListing, DocumentChunk, DocumentSummary, HealthStatus, Metadata,
    SourceReference, UploadReceipt,
};
