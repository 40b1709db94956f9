//! Type-safe builder for `ExportConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time validation
//! ensuring that the working directory and entry URL are set before building.

use crate::utils::{
    DEFAULT_CAPTURE_TIMEOUT_SECS, DEFAULT_EXPORT_FILE_NAME, DEFAULT_MAX_PAGES,
    DEFAULT_PAGE_LOAD_TIMEOUT_SECS, DEFAULT_RUN_TIMEOUT_SECS,
};
use anyhow::{Context, Result, anyhow, bail};
use std::marker::PhantomData;
use std::path::PathBuf;
use url::Url;

use super::types::{CapPolicy, ExportConfig, FailurePolicy, NetworkIdle, PdfLayout, Viewport};

// Type states for the builder
pub struct WithWorkingDir;
pub struct WithEntryUrl;

pub struct ExportConfigBuilder<State = ()> {
    pub(crate) working_dir: Option<PathBuf>,
    pub(crate) entry_url: Option<String>,
    pub(crate) max_pages: usize,
    pub(crate) viewport: Viewport,
    pub(crate) pdf_layout: PdfLayout,
    pub(crate) network_idle: NetworkIdle,
    pub(crate) headless: bool,
    pub(crate) page_load_timeout_secs: Option<u64>,
    pub(crate) capture_timeout_secs: Option<u64>,
    pub(crate) run_timeout_secs: Option<u64>,
    pub(crate) cap_policy: CapPolicy,
    pub(crate) failure_policy: FailurePolicy,
    pub(crate) export_file_name: String,
    pub(crate) chrome_data_dir: Option<PathBuf>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ExportConfigBuilder<()> {
    fn default() -> Self {
        Self {
            working_dir: None,
            entry_url: None,
            max_pages: DEFAULT_MAX_PAGES,
            viewport: Viewport::default(),
            pdf_layout: PdfLayout::default(),
            network_idle: NetworkIdle::default(),
            headless: true,
            page_load_timeout_secs: Some(DEFAULT_PAGE_LOAD_TIMEOUT_SECS),
            capture_timeout_secs: Some(DEFAULT_CAPTURE_TIMEOUT_SECS),
            run_timeout_secs: Some(DEFAULT_RUN_TIMEOUT_SECS),
            cap_policy: CapPolicy::default(),
            failure_policy: FailurePolicy::default(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            chrome_data_dir: None,
            _phantom: PhantomData,
        }
    }
}

impl ExportConfig {
    /// Create a builder for configuring an `ExportConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ExportConfigBuilder<()> {
        ExportConfigBuilder::default()
    }
}

impl<State> ExportConfigBuilder<State> {
    fn into_state<Next>(self) -> ExportConfigBuilder<Next> {
        ExportConfigBuilder {
            working_dir: self.working_dir,
            entry_url: self.entry_url,
            max_pages: self.max_pages,
            viewport: self.viewport,
            pdf_layout: self.pdf_layout,
            network_idle: self.network_idle,
            headless: self.headless,
            page_load_timeout_secs: self.page_load_timeout_secs,
            capture_timeout_secs: self.capture_timeout_secs,
            run_timeout_secs: self.run_timeout_secs,
            cap_policy: self.cap_policy,
            failure_policy: self.failure_policy,
            export_file_name: self.export_file_name,
            chrome_data_dir: self.chrome_data_dir,
            _phantom: PhantomData,
        }
    }
}

impl ExportConfigBuilder<()> {
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> ExportConfigBuilder<WithWorkingDir> {
        self.working_dir = Some(dir.into());
        self.into_state()
    }
}

impl ExportConfigBuilder<WithWorkingDir> {
    /// Set the entry document as a `file://` URL.
    ///
    /// The URL is validated in [`ExportConfigBuilder::build`], so a bad value
    /// surfaces as a build error rather than a panic here.
    pub fn entry_url(mut self, url: impl Into<String>) -> ExportConfigBuilder<WithEntryUrl> {
        self.entry_url = Some(url.into());
        self.into_state()
    }
}

// Build method only available when all required fields are set
impl ExportConfigBuilder<WithEntryUrl> {
    pub fn build(self) -> Result<ExportConfig> {
        let entry_url = self
            .entry_url
            .ok_or_else(|| anyhow!("entry_url is required"))?;
        let parsed = Url::parse(&entry_url)
            .with_context(|| format!("Invalid entry URL '{entry_url}'"))?;
        if parsed.scheme() != "file" {
            bail!(
                "Entry URL '{entry_url}' must use the file:// scheme, got '{}'",
                parsed.scheme()
            );
        }

        if self.max_pages == 0 {
            bail!("max_pages must be at least 1");
        }

        if self.export_file_name.is_empty()
            || self.export_file_name.contains(std::path::is_separator)
        {
            bail!(
                "export_file_name '{}' must be a plain file name",
                self.export_file_name
            );
        }

        let working_dir = self
            .working_dir
            .ok_or_else(|| anyhow!("working_dir is required"))?;
        let working_dir = std::path::absolute(&working_dir).with_context(|| {
            format!(
                "Failed to resolve working directory {}",
                working_dir.display()
            )
        })?;

        // Enforce headless mode in release builds for production safety
        #[cfg(not(debug_assertions))]
        let headless = if !self.headless {
            tracing::warn!(
                "Forcing headless mode in release build. \
                Headed mode is only available in debug builds for development."
            );
            true
        } else {
            self.headless
        };

        #[cfg(debug_assertions)]
        let headless = self.headless;

        Ok(ExportConfig {
            working_dir,
            entry_url,
            max_pages: self.max_pages,
            viewport: self.viewport,
            pdf_layout: self.pdf_layout,
            network_idle: self.network_idle,
            headless,
            page_load_timeout_secs: self.page_load_timeout_secs,
            capture_timeout_secs: self.capture_timeout_secs,
            run_timeout_secs: self.run_timeout_secs,
            cap_policy: self.cap_policy,
            failure_policy: self.failure_policy,
            export_file_name: self.export_file_name,
            chrome_data_dir: self.chrome_data_dir,
        })
    }
}
