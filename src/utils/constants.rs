//! Shared configuration constants for html2pdf
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default page cap: 1000 distinct documents per run
///
/// Large knowledge-base exports rarely exceed a few hundred pages; the cap
/// bounds disk usage for intermediates and the depth of the traversal stack.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Default navigation timeout for a single document
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// Default timeout for a single `printToPDF` call
///
/// Long documents with many images can take tens of seconds to print.
pub const DEFAULT_CAPTURE_TIMEOUT_SECS: u64 = 60;

/// Default wall-clock ceiling for a whole export run: 5 minutes
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 300;

/// File name of the merged document inside the working directory
pub const DEFAULT_EXPORT_FILE_NAME: &str = "Export.pdf";

/// Extension of intermediate per-page artifacts
pub const ARTIFACT_EXTENSION: &str = "pdf";

/// Extension of documents the traversal recurses into
pub const DOCUMENT_EXTENSION: &str = "html";

