//! Configuration module for HTML-to-PDF export
//!
//! This module provides the `ExportConfig` struct and its type-safe builder
//! for configuring export runs with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{ExportConfigBuilder, WithEntryUrl, WithWorkingDir};
pub use types::{
    CapPolicy, ExportConfig, FailurePolicy, NetworkIdle, PdfLayout, Viewport, mm_to_inches,
};
