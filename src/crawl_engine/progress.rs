//! Progress reporting abstraction for export runs
//!
//! Defines the `ProgressReporter` trait for lifecycle event reporting
//! and provides a no-op and a logging implementation.

use std::path::Path;

/// Trait for reporting export progress at key lifecycle events
///
/// Implementations can send updates to channels, log to console, update UI, etc.
pub trait ProgressReporter: Send + Sync {
    /// A URL was registered and assigned an artifact index
    fn report_page_discovered(&self, index: usize, url: &str);

    /// A document's artifact was written
    fn report_page_captured(&self, index: usize, url: &str);

    /// A URL was dropped because the page cap is reached
    fn report_cap_reached(&self, cap: usize, url: &str);

    /// Merging of intermediates has started
    fn report_merge_started(&self, artifacts: usize);

    /// The export was written
    fn report_completed(&self, export_path: &Path);

    /// Report an error that occurred during the export
    fn report_error(&self, error: &str);
}

/// Progress reporter that does nothing
///
/// All methods are no-ops and will be inlined away by the compiler.
#[derive(Debug, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_page_discovered(&self, _index: usize, _url: &str) {}

    #[inline(always)]
    fn report_page_captured(&self, _index: usize, _url: &str) {}

    #[inline(always)]
    fn report_cap_reached(&self, _cap: usize, _url: &str) {}

    #[inline(always)]
    fn report_merge_started(&self, _artifacts: usize) {}

    #[inline(always)]
    fn report_completed(&self, _export_path: &Path) {}

    #[inline(always)]
    fn report_error(&self, _error: &str) {}
}

/// Progress reporter that writes every event to the log
#[derive(Debug, Clone, Copy)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report_page_discovered(&self, index: usize, url: &str) {
        log::info!(target: "html2pdf::progress", "Generating PDF {index} for: {url}");
    }

    fn report_page_captured(&self, index: usize, url: &str) {
        log::debug!(target: "html2pdf::progress", "Captured PDF {index} for: {url}");
    }

    fn report_cap_reached(&self, cap: usize, url: &str) {
        log::debug!(target: "html2pdf::progress", "Page cap {cap} reached, dropping {url}");
    }

    fn report_merge_started(&self, artifacts: usize) {
        log::info!(target: "html2pdf::progress", "Merging {artifacts} PDFs");
    }

    fn report_completed(&self, export_path: &Path) {
        log::info!(target: "html2pdf::progress", "PDF saved at: {}", export_path.display());
    }

    fn report_error(&self, error: &str) {
        log::error!(target: "html2pdf::progress", "{error}");
    }
}
