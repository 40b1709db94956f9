//! Core types for export runs.
//!
//! This module contains the error type surfaced by an export and the reports
//! produced by the traversal, the assembler and the orchestrator.

use serde::Serialize;
use std::path::PathBuf;

/// Error type for export operations
///
/// Every variant names the URL or path that triggered it. Renderer failures
/// keep their `anyhow` chain as the source.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The renderer could not open or load a document
    #[error("Failed to load {url}: {source:#}")]
    Navigation {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// A loaded document could not be printed or its artifact not written
    #[error("Failed to capture {url}: {source:#}")]
    Capture {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// The page cap was reached and the cap policy is `Fail`
    #[error("Page cap of {cap} reached while discovering {url}")]
    CapacityExceeded { cap: usize, url: String },

    /// The merged document could not be produced
    #[error("Failed to assemble {}: {source:#}", path.display())]
    Assembly {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The working directory could not be prepared
    #[error("Failed to prepare working directory {}: {source}", path.display())]
    WorkingDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rendering engine could not be started
    #[error("Browser error: {0:#}")]
    Browser(anyhow::Error),

    /// The run exceeded its wall-clock ceiling
    #[error("Export timed out after {secs} seconds")]
    Timeout { secs: u64 },
}

impl ExportError {
    /// The document URL the error is about, if any
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Navigation { url, .. }
            | Self::Capture { url, .. }
            | Self::CapacityExceeded { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Convenience alias for Result with `ExportError`
pub type ExportResult<T> = Result<T, ExportError>;

/// Outcome of one traversal over the link graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalReport {
    /// Artifact file names in discovery (merge) order
    pub discovery_order: Vec<String>,
    /// Number of documents whose artifact was written
    pub captured: usize,
    /// Distinct URLs dropped because the cap was reached
    pub truncated: usize,
    /// URLs left out under `FailurePolicy::SkipBranch`
    pub failed: Vec<String>,
}

/// Outcome of merging intermediates into the export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub export_path: PathBuf,
    /// Intermediates that contributed pages, in merge order
    pub merged: Vec<String>,
    /// Intermediates named in the order that were not on disk
    pub missing: Vec<String>,
    /// Total pages in the export
    pub page_count: usize,
}

/// What a successful export produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOutcome {
    pub export_path: PathBuf,
    /// Documents that contributed to the export
    pub documents: usize,
    pub page_count: usize,
    pub truncated: usize,
    pub failed: Vec<String>,
    pub missing: Vec<String>,
}
