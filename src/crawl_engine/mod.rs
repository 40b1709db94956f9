//! Export Engine Module
//!
//! This module contains the traversal, workspace handling and orchestration
//! that turn an entry document into a single merged export.

// Sub-modules
pub mod cleanup;
pub mod crawl_types;
pub mod link_processor;
pub mod orchestrator;
pub mod page_timeout;
pub mod progress;
pub mod traversal;
pub mod workspace;

// Re-export orchestration and progress types for advanced usage
pub use orchestrator::{export, export_with};
pub use progress::{LogProgress, NoOpProgress, ProgressReporter};

// Re-export traversal types
pub use traversal::{Traversal, TraversalSettings};

// Re-export link filtering
pub use link_processor::{in_scope_links, is_in_scope, normalize_url};

// Re-export workspace lifecycle
pub use workspace::{
    artifact_file_name, is_intermediate_artifact, prepare_working_dir, remove_intermediates,
};

// Re-export export types
pub use crawl_types::{ExportError, ExportOutcome, ExportResult, MergeReport, TraversalReport};
