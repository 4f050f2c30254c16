//! Removal of temporary uploads from the RAG store.
//!
//! Upload handlers spill files to temporary paths (`tmpXXXXXXXX.ext`) before
//! indexing, and some of those names end up in the index. This module finds
//! every such filename and deletes its chunks.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::RagError;
use crate::store::{DeleteStatus, DocumentStore, RagStats};

/// A temporary upload indexed before temporary names were filtered out.
pub const LEGACY_TEMP_FILENAME: &str = "tmp7om2ussc.xls";

/// Whether `filename` names a temporary upload.
pub fn is_temporary_filename(filename: &str) -> bool {
    filename.to_lowercase().contains("tmp") || filename == LEGACY_TEMP_FILENAME
}

/// What happened to one filename during cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    Deleted { chunks: u64 },
    NotFound,
    Failed { error: String },
    /// Dry run: matched but left in place.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCleanup {
    pub filename: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupReport {
    pub dry_run: bool,
    pub stats_before: RagStats,
    /// Re-read after deleting; equal to `stats_before` when nothing was deleted.
    pub stats_after: RagStats,
    /// One entry per distinct temporary filename, sorted by name.
    pub files: Vec<FileCleanup>,
}

impl CleanupReport {
    pub fn chunks_deleted(&self) -> u64 {
        self.files
            .iter()
            .map(|f| match f.outcome {
                FileOutcome::Deleted { chunks } => chunks,
                _ => 0,
            })
            .sum()
    }

    pub fn failures(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed { .. }))
            .count()
    }
}

/// Delete every document whose filename looks temporary.
///
/// Per-file failures are recorded and do not stop the run; only failing to
/// read stats or the document listing aborts.
pub async fn clean_temporary_documents<S>(store: &S, dry_run: bool) -> Result<CleanupReport, RagError>
where
    S: DocumentStore + ?Sized,
{
    let stats_before = store.get_stats().await?;
    tracing::info!(
        total_chunks = stats_before.total_chunks,
        unique_documents = stats_before.unique_documents,
        "RAG store stats before cleanup",
    );

    let candidates: BTreeSet<String> = store
        .get_all_documents()
        .await?
        .into_iter()
        .map(|doc| doc.metadata.filename)
        .filter(|name| is_temporary_filename(name))
        .collect();

    if candidates.is_empty() {
        tracing::info!("No temporary documents found");
        return Ok(CleanupReport {
            dry_run,
            stats_after: stats_before.clone(),
            stats_before,
            files: Vec::new(),
        });
    }
    tracing::info!(count = candidates.len(), dry_run, "Found temporary documents");

    let mut files = Vec::with_capacity(candidates.len());
    for filename in candidates {
        let outcome = if dry_run {
            FileOutcome::Skipped
        } else {
            delete_one(store, &filename).await
        };
        files.push(FileCleanup { filename, outcome });
    }

    let deleted_any = files
        .iter()
        .any(|f| matches!(f.outcome, FileOutcome::Deleted { .. }));
    let stats_after = if deleted_any {
        store.get_stats().await?
    } else {
        stats_before.clone()
    };

    let report = CleanupReport {
        dry_run,
        stats_before,
        stats_after,
        files,
    };
    tracing::info!(
        chunks_deleted = report.chunks_deleted(),
        failures = report.failures(),
        total_chunks = report.stats_after.total_chunks,
        "RAG cleanup finished",
    );
    Ok(report)
}

async fn delete_one<S>(store: &S, filename: &str) -> FileOutcome
where
    S: DocumentStore + ?Sized,
{
    match store.delete_document(filename).await {
        Ok(outcome) if outcome.status == DeleteStatus::Success => {
            let chunks = outcome.chunks_deleted.unwrap_or(0);
            tracing::info!(filename, chunks, "Deleted temporary document");
            FileOutcome::Deleted { chunks }
        }
        Ok(_) => {
            tracing::warn!(filename, "Temporary document not found");
            FileOutcome::NotFound
        }
        Err(e) => {
            tracing::error!(filename, error = %e, "Failed to delete temporary document");
            FileOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::store::{DeleteOutcome, DocumentMetadata, StoredDocument};

    /// In-memory store holding `(filename, chunk)` pairs.
    struct MemoryStore {
        chunks: Mutex<Vec<String>>,
        failing: Option<String>,
    }

    impl MemoryStore {
        fn new(files: &[(&str, usize)]) -> Self {
            let chunks = files
                .iter()
                .flat_map(|(name, n)| std::iter::repeat(name.to_string()).take(*n))
                .collect();
            Self {
                chunks: Mutex::new(chunks),
                failing: None,
            }
        }

        fn remaining(&self) -> Vec<String> {
            let mut names = self.chunks.lock().unwrap().clone();
            names.dedup();
            names
        }
    }

    #[async_trait]
    impl DocumentStore for MemoryStore {
        async fn get_stats(&self) -> Result<RagStats, RagError> {
            let chunks = self.chunks.lock().unwrap();
            let unique: BTreeSet<&String> = chunks.iter().collect();
            let mut file_types = BTreeMap::new();
            for name in &unique {
                let ext = name.rsplit('.').next().unwrap_or_default().to_string();
                *file_types.entry(ext).or_insert(0) += 1;
            }
            Ok(RagStats {
                total_chunks: chunks.len() as u64,
                unique_documents: unique.len() as u64,
                file_types,
            })
        }

        async fn get_all_documents(&self) -> Result<Vec<StoredDocument>, RagError> {
            Ok(self
                .chunks
                .lock()
                .unwrap()
                .iter()
                .map(|name| StoredDocument {
                    content: Some(format!("chunk of {name}")),
                    metadata: DocumentMetadata {
                        filename: name.clone(),
                        extra: Default::default(),
                    },
                })
                .collect())
        }

        async fn delete_document(&self, filename: &str) -> Result<DeleteOutcome, RagError> {
            if self.failing.as_deref() == Some(filename) {
                return Err(RagError::ApiError {
                    status: 500,
                    body: "index locked".into(),
                });
            }
            let mut chunks = self.chunks.lock().unwrap();
            let before = chunks.len();
            chunks.retain(|name| name != filename);
            let removed = (before - chunks.len()) as u64;
            Ok(if removed == 0 {
                DeleteOutcome::not_found()
            } else {
                DeleteOutcome::deleted(removed)
            })
        }
    }

    #[test]
    fn temporary_filename_detection() {
        assert!(is_temporary_filename("tmpABC.csv"));
        assert!(is_temporary_filename("TMP_upload.pdf"));
        assert!(is_temporary_filename("data-tmp.xlsx"));
        assert!(is_temporary_filename(LEGACY_TEMP_FILENAME));
        assert!(!is_temporary_filename("report.pdf"));
        assert!(!is_temporary_filename("t m p.txt"));
    }

    #[tokio::test]
    async fn deletes_only_temporary_documents() {
        let store = MemoryStore::new(&[("report.pdf", 4), ("tmp7om2ussc.xls", 3), ("tmpABC.csv", 2)]);

        let report = clean_temporary_documents(&store, false).await.unwrap();

        let names: Vec<&str> = report.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["tmp7om2ussc.xls", "tmpABC.csv"]);
        assert_eq!(report.files[0].outcome, FileOutcome::Deleted { chunks: 3 });
        assert_eq!(report.files[1].outcome, FileOutcome::Deleted { chunks: 2 });
        assert_eq!(report.chunks_deleted(), 5);
        assert_eq!(
            report.stats_after.total_chunks,
            report.stats_before.total_chunks - report.chunks_deleted()
        );
        assert_eq!(report.stats_after.unique_documents, 1);
        assert_eq!(store.remaining(), vec!["report.pdf"]);
    }

    #[tokio::test]
    async fn nothing_to_clean_leaves_stats_unchanged() {
        let store = MemoryStore::new(&[("report.pdf", 4)]);
        let report = clean_temporary_documents(&store, false).await.unwrap();
        assert!(report.files.is_empty());
        assert_eq!(report.stats_before, report.stats_after);
    }

    #[tokio::test]
    async fn dry_run_deletes_nothing() {
        let store = MemoryStore::new(&[("report.pdf", 1), ("tmpABC.csv", 2)]);
        let report = clean_temporary_documents(&store, true).await.unwrap();
        assert_eq!(report.files[0].outcome, FileOutcome::Skipped);
        assert_eq!(report.chunks_deleted(), 0);
        assert_eq!(store.remaining(), vec!["report.pdf", "tmpABC.csv"]);
    }

    #[tokio::test]
    async fn failed_delete_does_not_stop_the_run() {
        let mut store = MemoryStore::new(&[("tmpA.csv", 1), ("tmpB.csv", 2)]);
        store.failing = Some("tmpA.csv".into());

        let report = clean_temporary_documents(&store, false).await.unwrap();

        assert!(matches!(report.files[0].outcome, FileOutcome::Failed { .. }));
        assert_eq!(report.files[1].outcome, FileOutcome::Deleted { chunks: 2 });
        assert_eq!(report.failures(), 1);
        assert_eq!(store.remaining(), vec!["tmpA.csv"]);
    }
}
