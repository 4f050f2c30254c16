//! The document store seam and the shapes it exchanges.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RagError;

/// Index-wide counters reported by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RagStats {
    #[serde(default)]
    pub total_chunks: u64,
    #[serde(default)]
    pub unique_documents: u64,
    /// Document count per file type (extension), as reported by the service.
    #[serde(default)]
    pub file_types: BTreeMap<String, u64>,
}

/// Metadata attached to every chunk. Only `filename` is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub filename: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One indexed chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteStatus {
    Success,
    NotFound,
}

/// Result of deleting every chunk of one filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub status: DeleteStatus,
    #[serde(default)]
    pub chunks_deleted: Option<u64>,
}

impl DeleteOutcome {
    pub fn deleted(chunks: u64) -> Self {
        Self {
            status: DeleteStatus::Success,
            chunks_deleted: Some(chunks),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: DeleteStatus::NotFound,
            chunks_deleted: None,
        }
    }
}

/// Operations the maintenance tooling needs from a document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_stats(&self) -> Result<RagStats, RagError>;

    async fn get_all_documents(&self) -> Result<Vec<StoredDocument>, RagError>;

    /// Delete every chunk indexed under `filename`.
    async fn delete_document(&self, filename: &str) -> Result<DeleteOutcome, RagError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_tolerates_missing_content_and_keeps_metadata() {
        let doc: StoredDocument = serde_json::from_value(serde_json::json!({
            "metadata": { "filename": "plan.pdf", "page": 3 }
        }))
        .unwrap();
        assert_eq!(doc.content, None);
        assert_eq!(doc.metadata.filename, "plan.pdf");
        assert_eq!(doc.metadata.extra["page"], 3);
    }

    #[test]
    fn delete_outcome_parses_service_status() {
        let outcome: DeleteOutcome =
            serde_json::from_str(r#"{"status":"success","chunks_deleted":4}"#).unwrap();
        assert_eq!(outcome, DeleteOutcome::deleted(4));

        let outcome: DeleteOutcome = serde_json::from_str(r#"{"status":"not_found"}"#).unwrap();
        assert_eq!(outcome, DeleteOutcome::not_found());
    }
}
