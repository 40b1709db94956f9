pub mod browser_setup;
pub mod config;
pub mod crawl_engine;
pub mod page_extractor;
pub mod page_renderer;
pub mod pdf_assembler;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{CapPolicy, ExportConfig, FailurePolicy, NetworkIdle, PdfLayout, Viewport};
pub use crawl_engine::{
    ExportError, ExportOutcome, ExportResult, LogProgress, MergeReport, NoOpProgress,
    ProgressReporter, Traversal, TraversalReport, TraversalSettings, export_with,
};
pub use page_renderer::{ChromiumRenderer, PageRenderer};
pub use pdf_assembler::merge;
pub use utils::{entry_url_from_path, resolve_entry};

/// Export the document set reachable from the configured entry page
///
/// Launches Chromium, walks the link graph depth-first and writes the merged
/// PDF into the working directory.
pub async fn export(config: ExportConfig) -> ExportResult<ExportOutcome> {
    crawl_engine::export(config).await
}
