//! Core configuration types for HTML-to-PDF export
//!
//! This module contains the main `ExportConfig` struct and the layout and
//! policy types that parameterize a single export run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{
    DEFAULT_CAPTURE_TIMEOUT_SECS, DEFAULT_EXPORT_FILE_NAME, DEFAULT_MAX_PAGES,
    DEFAULT_PAGE_LOAD_TIMEOUT_SECS, DEFAULT_RUN_TIMEOUT_SECS,
};

/// Millimetres per inch, used to express CSS-style margins to `printToPDF`.
const MM_PER_INCH: f64 = 25.4;

/// Main configuration struct for an export run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving intermediate artifacts and the final export.
    ///
    /// **INVARIANT:** Always an absolute path (normalized in builder).
    pub(crate) working_dir: PathBuf,

    /// Absolute `file://` URL of the entry document.
    pub(crate) entry_url: String,

    /// Hard ceiling on distinct pages discovered in one run.
    pub(crate) max_pages: usize,

    pub(crate) viewport: Viewport,
    pub(crate) pdf_layout: PdfLayout,
    pub(crate) network_idle: NetworkIdle,
    pub(crate) headless: bool,

    /// Timeout in seconds for `page.goto()` on each document
    ///
    /// Default: 30 seconds
    pub(crate) page_load_timeout_secs: Option<u64>,

    /// Timeout in seconds for a single `printToPDF` call
    ///
    /// Default: 60 seconds
    pub(crate) capture_timeout_secs: Option<u64>,

    /// Wall-clock ceiling for traversal plus merge. `None` disables it.
    ///
    /// Default: 300 seconds
    pub(crate) run_timeout_secs: Option<u64>,

    pub(crate) cap_policy: CapPolicy,
    pub(crate) failure_policy: FailurePolicy,

    /// File name of the merged document inside `working_dir`.
    pub(crate) export_file_name: String,

    /// Chrome user data directory path for browser profile isolation
    #[serde(skip)]
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

/// Fixed browser window metrics applied to every page before navigation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            device_scale_factor: 1.0,
        }
    }
}

/// Print settings handed to the renderer for every captured document
///
/// All lengths are in inches, which is what `Page.printToPDF` expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfLayout {
    pub paper_width_in: f64,
    pub paper_height_in: f64,
    pub margin_top_in: f64,
    pub margin_bottom_in: f64,
    pub margin_left_in: f64,
    pub margin_right_in: f64,
    pub landscape: bool,
    pub print_background: bool,
    pub display_header_footer: bool,
    pub header_template: String,
    pub footer_template: String,
}

impl PdfLayout {
    /// A4 portrait with 20mm top/bottom margins, backgrounds on and an
    /// empty footer that still reserves its band.
    #[must_use]
    pub fn a4() -> Self {
        Self {
            paper_width_in: 8.27,
            paper_height_in: 11.69,
            margin_top_in: mm_to_inches(20.0),
            margin_bottom_in: mm_to_inches(20.0),
            margin_left_in: 0.0,
            margin_right_in: 0.0,
            landscape: false,
            print_background: true,
            display_header_footer: true,
            header_template: "<span></span>".to_string(),
            footer_template: "<span></span>".to_string(),
        }
    }

    /// US Letter with the same margins and footer policy as [`PdfLayout::a4`].
    #[must_use]
    pub fn letter() -> Self {
        Self {
            paper_width_in: 8.5,
            paper_height_in: 11.0,
            ..Self::a4()
        }
    }
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self::a4()
    }
}

#[must_use]
pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

/// When a page counts as loaded: few enough requests in flight for long enough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIdle {
    /// Requests allowed to stay in flight while still counting as idle.
    pub max_inflight: usize,
    /// How long the in-flight count must stay at or below `max_inflight`.
    pub idle_window_ms: u64,
    /// Upper bound on the wait; the page is captured anyway after this.
    pub max_wait_secs: u64,
}

impl Default for NetworkIdle {
    fn default() -> Self {
        Self {
            max_inflight: 2,
            idle_window_ms: 500,
            max_wait_secs: 30,
        }
    }
}

/// What happens once the page cap is reached and another URL is discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapPolicy {
    /// Drop the URL without any signal.
    Ignore,
    /// Drop the URL, log a warning and count it in the report.
    #[default]
    Warn,
    /// Abort the run with `ExportError::CapacityExceeded`.
    Fail,
}

/// What happens when a page cannot be loaded or captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failure aborts the whole export.
    #[default]
    Abort,
    /// The failed page is left out and its siblings still run.
    SkipBranch,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("./out"),
            entry_url: String::new(),
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
        }
    }
}
