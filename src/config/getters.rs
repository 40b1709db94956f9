//! Getter methods for `ExportConfig`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from an `ExportConfig` instance.

use std::path::{Path, PathBuf};

use super::types::{CapPolicy, ExportConfig, FailurePolicy, NetworkIdle, PdfLayout, Viewport};
use crate::utils::{
    DEFAULT_CAPTURE_TIMEOUT_SECS, DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
};

impl ExportConfig {
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    #[must_use]
    pub fn entry_url(&self) -> &str {
        &self.entry_url
    }

    #[must_use]
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn pdf_layout(&self) -> &PdfLayout {
        &self.pdf_layout
    }

    #[must_use]
    pub fn network_idle(&self) -> NetworkIdle {
        self.network_idle
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    /// Get the navigation timeout in seconds
    ///
    /// If None, defaults to 30 seconds.
    #[must_use]
    pub fn page_load_timeout_secs(&self) -> u64 {
        self.page_load_timeout_secs
            .unwrap_or(DEFAULT_PAGE_LOAD_TIMEOUT_SECS)
    }

    /// Get the `printToPDF` timeout in seconds
    ///
    /// If None, defaults to 60 seconds.
    #[must_use]
    pub fn capture_timeout_secs(&self) -> u64 {
        self.capture_timeout_secs
            .unwrap_or(DEFAULT_CAPTURE_TIMEOUT_SECS)
    }

    #[must_use]
    pub fn run_timeout_secs(&self) -> Option<u64> {
        self.run_timeout_secs
    }

    #[must_use]
    pub fn cap_policy(&self) -> CapPolicy {
        self.cap_policy
    }

    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    #[must_use]
    pub fn export_file_name(&self) -> &str {
        &self.export_file_name
    }

    /// Full path of the merged document
    #[must_use]
    pub fn export_path(&self) -> PathBuf {
        self.working_dir.join(&self.export_file_name)
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }
}
