//! Browser and resource cleanup functionality
//!
//! This module handles releasing the browser once an export run is over.

use chromiumoxide::Browser;
use log::{debug, warn};
use std::path::Path;

/// Result of cleanup operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    /// All cleanup operations succeeded
    Success,
    /// Some cleanup operations failed, with error details
    PartialFailure(Vec<String>),
}

/// Close the browser, wait for its process and remove the profile directory
///
/// Every step runs even if an earlier one fails; failures are collected.
pub async fn cleanup_browser_and_data(mut browser: Browser, chrome_data_dir: &Path) -> CleanupResult {
    let mut errors = Vec::new();

    debug!(target: "html2pdf::cleanup", "Closing browser");
    if let Err(e) = browser.close().await {
        warn!(target: "html2pdf::cleanup", "Failed to close browser: {e}");
        errors.push(format!("Browser close failed: {e}"));
    }

    // Wait for browser process to fully exit (prevents "not closed manually" warning)
    debug!(target: "html2pdf::cleanup", "Waiting for browser process to exit");
    if let Err(e) = browser.wait().await {
        warn!(target: "html2pdf::cleanup", "Failed to wait for browser exit: {e}");
        errors.push(format!("Browser wait failed: {e}"));
    }

    debug!(target: "html2pdf::cleanup", "Cleaning up Chrome data directory");
    if let Err(e) = std::fs::remove_dir_all(chrome_data_dir) {
        warn!(target: "html2pdf::cleanup", "Failed to clean up Chrome data directory: {e}");
        errors.push(format!("Directory cleanup failed: {e}"));
    }

    if errors.is_empty() {
        CleanupResult::Success
    } else {
        CleanupResult::PartialFailure(errors)
    }
}
