//! HTTP implementation of [`RagBackend`].
//!
//! Endpoints:
//! - `GET /` health probe
//! - `POST /ask` with `{"question": ...}`
//! - `POST /upload` multipart, field `file`
//! - `GET /db/documents`
//! - `GET /db/document/{name}`

use crate::backend::RagBackend;
use crate::types::{
    AskRequest, AskResponse, AskWire, ChunkListing, DocumentSummary, HealthStatus, UploadReceipt,
};
use ragdesk_core::{AppError, AppResult};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// RAG backend reached over HTTP.
pub struct HttpBackend {
    /// Base URL as configured, without trailing slash
    base_url: String,

    /// Parsed base URL endpoints are built from
    base: Url,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let base = Url::parse(&base_url).map_err(|e| {
            AppError::Config(format!("Invalid backend URL '{}': {}", base_url, e))
        })?;

        if base.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "Backend URL '{}' cannot carry a path",
                base_url
            )));
        }

        Ok(Self {
            base_url,
            base,
            client: reqwest::Client::new(),
        })
    }

    /// Build an endpoint URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and decode a JSON body.
    ///
    /// Network errors and non-2xx statuses are `Transport`; a body that
    /// does not decode into `T` is `Protocol`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> AppResult<T> {
        let response = request.send().await.map_err(|e| {
            AppError::Transport(format!("{} request failed: {}", operation, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Transport(format!(
                "{} returned {}: {}",
                operation, status, error_text
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            AppError::Transport(format!("Failed to read {} response: {}", operation, e))
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            AppError::Protocol(format!("Failed to parse {} response: {}", operation, e))
        })
    }
}

/// Check that a document name survives as a single path segment.
///
/// URL path normalization drops `.` and `..`, which would send the request
/// to a different route.
fn document_segment(name: &str) -> AppResult<&str> {
    match name {
        "" | "." | ".." => Err(AppError::Config(format!(
            "Invalid document name '{}'",
            name
        ))),
        _ => Ok(name),
    }
}

/// Content type sent with an uploaded file, guessed from its extension.
fn upload_mime(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        _ => "application/octet-stream",
    }
}

#[async_trait::async_trait]
impl RagBackend for HttpBackend {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check_health(&self) -> HealthStatus {
        let url = self.endpoint(&[]);
        tracing::debug!("Probing backend health at {}", url);

        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => HealthStatus::Ok,
            Ok(response) => {
                tracing::warn!("Health probe returned {}", response.status());
                HealthStatus::Unreachable
            }
            Err(e) => {
                tracing::warn!("Health probe failed: {}", e);
                HealthStatus::Unreachable
            }
        }
    }

    async fn ask(&self, question: &str) -> AppResult<AskResponse> {
        tracing::debug!("Sending ask request ({} chars)", question.len());

        let request = self
            .client
            .post(self.endpoint(&["ask"]))
            .json(&AskRequest { question });

        let wire: AskWire = self.send_json(request, "ask").await?;
        let response = AskResponse::try_from(wire)?;

        tracing::debug!("Received answer with {} sources", response.sources.len());
        Ok(response)
    }

    async fn upload(&self, file: Vec<u8>, filename: &str) -> AppResult<UploadReceipt> {
        tracing::debug!("Uploading {} ({} bytes)", filename, file.len());

        let part = reqwest::multipart::Part::bytes(file)
            .file_name(filename.to_string())
            .mime_str(upload_mime(filename))
            .map_err(|e| AppError::Transport(format!("Invalid upload content type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let request = self.client.post(self.endpoint(&["upload"])).multipart(form);
        self.send_json(request, "upload").await
    }

    async fn list_documents(&self) -> AppResult<Vec<DocumentSummary>> {
        let request = self.client.get(self.endpoint(&["db", "documents"]));
        let documents: Vec<DocumentSummary> = self.send_json(request, "list documents").await?;

        tracing::debug!("Backend reports {} documents", documents.len());
        Ok(documents)
    }

    async fn get_document_chunks(&self, name: &str) -> AppResult<ChunkListing> {
        let segment = document_segment(name)?;
        let request = self.client.get(self.endpoint(&["db", "document", segment]));
        let listing: ChunkListing = self.send_json(request, "document chunks").await?;

        tracing::debug!("Fetched {} chunks for {}", listing.chunks.len(), name);
        Ok(listing)
    }
}
