//! Backend request/response types.
//!
//! Wire shapes are decoded here and converted into named types, so the
//! rest of the client never indexes into positional JSON.

use ragdesk_core::{AppError, AppResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Free-form chunk metadata as stored by the backend.
pub type Metadata = serde_json::Map<String, Value>;

/// Label shown for a source whose metadata carries no `source` field.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Outcome of the health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Ok,
    Unreachable,
}

/// Body of `POST /ask`.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
}

/// A chunk cited by the backend as evidence for an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReference {
    pub id: String,
    pub text: String,
    pub metadata: Option<Metadata>,
}

impl SourceReference {
    /// Document the chunk came from, or `"unknown"`.
    pub fn source_name(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|meta| meta.get("source"))
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_SOURCE)
    }
}

impl TryFrom<Value> for SourceReference {
    type Error = AppError;

    /// Convert a `[id, text, metadata]` tuple.
    ///
    /// The metadata element may be `null` or missing. A `null` text is
    /// treated as empty.
    fn try_from(value: Value) -> AppResult<Self> {
        let items = match value {
            Value::Array(items) if items.len() == 2 || items.len() == 3 => items,
            other => {
                return Err(AppError::Protocol(format!(
                    "source must be an [id, text, metadata] array, got {}",
                    other
                )))
            }
        };

        let mut items = items.into_iter();
        let id = match items.next() {
            Some(Value::String(id)) => id,
            other => {
                return Err(AppError::Protocol(format!(
                    "source id must be a string, got {:?}",
                    other
                )))
            }
        };
        let text = match items.next() {
            Some(Value::String(text)) => text,
            Some(Value::Null) => String::new(),
            other => {
                return Err(AppError::Protocol(format!(
                    "source text must be a string, got {:?}",
                    other
                )))
            }
        };
        let metadata = match items.next() {
            Some(Value::Object(meta)) => Some(meta),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(AppError::Protocol(format!(
                    "source metadata must be an object, got {}",
                    other
                )))
            }
        };

        Ok(Self { id, text, metadata })
    }
}

/// Raw `POST /ask` response as sent by the backend.
#[derive(Debug, Deserialize)]
pub(crate) struct AskWire {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<Value>>,
}

/// Answer to a question, with the chunks that support it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskResponse {
    /// `None` when the backend omitted the field
    pub answer: Option<String>,
    pub sources: Vec<SourceReference>,
}

impl TryFrom<AskWire> for AskResponse {
    type Error = AppError;

    fn try_from(wire: AskWire) -> AppResult<Self> {
        let sources = wire
            .sources
            .unwrap_or_default()
            .into_iter()
            .map(SourceReference::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            answer: wire.answer,
            sources,
        })
    }
}

/// Result of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
    pub chunks_inserted: u64,
}

/// One ingested document and how many chunks it was split into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    #[serde(rename = "document")]
    pub name: String,
    #[serde(rename = "chunks")]
    pub chunk_count: u64,
}

/// A stored chunk of a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default_map")]
    pub metadata: Metadata,
}

/// Result of `GET /db/document/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkListing {
    pub chunks: Vec<DocumentChunk>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_map<'de, D>(deserializer: D) -> Result<Metadata, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Metadata>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_tuple_conversion() {
        let source =
            SourceReference::try_from(json!(["s1", "text A", {"source": "doc1.pdf", "page": 3}]))
                .unwrap();

        assert_eq!(source.id, "s1");
        assert_eq!(source.text, "text A");
        assert_eq!(source.source_name(), "doc1.pdf");
    }

    #[test]
    fn test_source_without_metadata_is_unknown() {
        let null_meta = SourceReference::try_from(json!(["s1", "text", null])).unwrap();
        assert!(null_meta.metadata.is_none());
        assert_eq!(null_meta.source_name(), "unknown");

        let two_items = SourceReference::try_from(json!(["s2", "text"])).unwrap();
        assert_eq!(two_items.source_name(), "unknown");

        let no_field = SourceReference::try_from(json!(["s3", "text", {"page": 1}])).unwrap();
        assert_eq!(no_field.source_name(), "unknown");
    }

    #[test]
    fn test_source_rejects_bad_shapes() {
        assert!(SourceReference::try_from(json!({"id": "s1"})).is_err());
        assert!(SourceReference::try_from(json!(["s1"])).is_err());
        assert!(SourceReference::try_from(json!([1, "text", null])).is_err());
        assert!(SourceReference::try_from(json!(["s1", "text", "meta"])).is_err());
    }

    #[test]
    fn test_ask_wire_defaults() {
        let wire: AskWire = serde_json::from_value(json!({})).unwrap();
        let response = AskResponse::try_from(wire).unwrap();
        assert!(response.answer.is_none());
        assert!(response.sources.is_empty());

        let wire: AskWire = serde_json::from_value(json!({"answer": "A", "sources": null})).unwrap();
        let response = AskResponse::try_from(wire).unwrap();
        assert_eq!(response.answer.as_deref(), Some("A"));
        assert!(response.sources.is_empty());
    }

    #[test]
    fn test_ask_wire_bad_source_fails_whole_response() {
        let wire: AskWire = serde_json::from_value(json!({
            "answer": "X is Y",
            "sources": [["s1", "ok", null], "broken"]
        }))
        .unwrap();

        assert!(matches!(
            AskResponse::try_from(wire),
            Err(AppError::Protocol(_))
        ));
    }

    #[test]
    fn test_document_summary_wire_names() {
        let docs: Vec<DocumentSummary> =
            serde_json::from_value(json!([{"document": "report.pdf", "chunks": 12}])).unwrap();
        assert_eq!(
            docs,
            vec![DocumentSummary {
                name: "report.pdf".to_string(),
                chunk_count: 12
            }]
        );
    }

    #[test]
    fn test_chunk_listing_tolerates_nulls() {
        let listing: ChunkListing = serde_json::from_value(json!({
            "document": "a.md",
            "count": 1,
            "chunks": [{"id": "a.md_0", "text": null, "metadata": null}]
        }))
        .unwrap();

        assert_eq!(listing.chunks.len(), 1);
        assert_eq!(listing.chunks[0].text, "");
        assert!(listing.chunks[0].metadata.is_empty());
    }
}
