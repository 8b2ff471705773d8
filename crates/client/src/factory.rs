//! Backend factory.
//!
//! Resolves a configured base address into a shareable backend handle.

use crate::backend::RagBackend;
use crate::http::HttpBackend;
use ragdesk_core::{AppError, AppResult};
use std::sync::Arc;

/// Create a backend client for `base_url`.
///
/// # Errors
/// Returns `AppError::Config` if the URL does not parse or uses a scheme
/// other than `http`/`https`.
pub fn create_backend(base_url: &str) -> AppResult<Arc<dyn RagBackend>> {
    let scheme = base_url
        .split_once("://")
        .map(|(scheme, _)| scheme.to_ascii_lowercase());

    match scheme.as_deref() {
        Some("http") | Some("https") => {
            let backend = HttpBackend::new(base_url)?;
            tracing::debug!("Using backend at {}", backend.base_url());
            Ok(Arc::new(backend))
        }
        Some(other) => Err(AppError::Config(format!(
            "Unsupported backend URL scheme '{}'. Supported: http, https",
            other
        ))),
        None => Err(AppError::Config(format!(
            "Backend URL '{}' has no scheme",
            base_url
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_http_backend() {
        let backend = create_backend("http://127.0.0.1:8000").unwrap();
        assert_eq!(backend.base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_create_https_backend() {
        assert!(create_backend("HTTPS://rag.example.com/").is_ok());
    }

    #[test]
    fn test_unsupported_scheme() {
        match create_backend("ftp://127.0.0.1") {
            Err(err) => assert!(err.to_string().contains("Unsupported backend URL scheme")),
            Ok(_) => panic!("Expected error for ftp scheme"),
        }
    }

    #[test]
    fn test_missing_scheme() {
        match create_backend("127.0.0.1:8000") {
            Err(err) => assert!(err.to_string().contains("has no scheme")),
            Ok(_) => panic!("Expected error for URL without scheme"),
        }
    }
}
