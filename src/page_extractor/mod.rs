//! Page data extraction functions.
//!
//! This module provides the browser-side operations the Chromium renderer
//! performs on a loaded document: link extraction, network-idle waiting and
//! PDF printing.

// Sub-modules
pub mod extractors;
pub mod js_scripts;

// Re-exports for public API
pub use extractors::{NetworkTracker, apply_viewport, extract_links, print_pdf, wait_for_network_idle};
