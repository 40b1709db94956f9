//! Builder methods available for all states
//!
//! This module contains methods that can be called on the builder
//! regardless of its current type state.

use std::path::PathBuf;

use super::builder::ExportConfigBuilder;
use super::types::{CapPolicy, FailurePolicy, NetworkIdle, PdfLayout, Viewport};

impl<State> ExportConfigBuilder<State> {
    /// Set the hard ceiling on distinct pages discovered in one run
    ///
    /// Every URL discovered after the cap is reached is dropped according to
    /// the configured [`CapPolicy`].
    ///
    /// # Example
    /// ```rust
    /// # use kodegen_tools_html2pdf::config::ExportConfig;
    /// # fn main() -> anyhow::Result<()> {
    /// let config = ExportConfig::builder()
    ///     .working_dir("./out")
    ///     .entry_url("file:///tmp/export/index.html")
    ///     .max_pages(50)
    ///     .build()?;
    /// assert_eq!(config.max_pages(), 50);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn pdf_layout(mut self, layout: PdfLayout) -> Self {
        self.pdf_layout = layout;
        self
    }

    #[must_use]
    pub fn network_idle(mut self, network_idle: NetworkIdle) -> Self {
        self.network_idle = network_idle;
        self
    }

    /// Set browser headless mode
    ///
    /// Headed mode needs a display server and is only honored in debug
    /// builds; release builds force headless and log a warning.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.page_load_timeout_secs = Some(timeout_secs);
        self
    }

    #[must_use]
    pub fn capture_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.capture_timeout_secs = Some(timeout_secs);
        self
    }

    /// Set the wall-clock ceiling for a whole run (traversal and merge)
    ///
    /// `None` disables the ceiling. A run that exceeds it fails with
    /// `ExportError::Timeout` after the browser and intermediates are
    /// cleaned up.
    #[must_use]
    pub fn run_timeout_secs(mut self, timeout_secs: Option<u64>) -> Self {
        self.run_timeout_secs = timeout_secs;
        self
    }

    #[must_use]
    pub fn cap_policy(mut self, policy: CapPolicy) -> Self {
        self.cap_policy = policy;
        self
    }

    #[must_use]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    #[must_use]
    pub fn export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = name.into();
        self
    }

    /// Use a fixed Chrome profile directory instead of a per-process temp one
    #[must_use]
    pub fn chrome_data_dir(mut self, dir: Option<impl Into<PathBuf>>) -> Self {
        self.chrome_data_dir = dir.map(Into::into);
        self
    }
}
