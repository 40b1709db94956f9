//! Page rendering capability
//!
//! The traversal drives a [`PageRenderer`] and never touches a browser
//! directly, so it can run against the Chromium implementation or a scripted
//! fake in tests.

pub mod chromium;

pub use chromium::ChromiumRenderer;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::PdfLayout;

/// A browser engine able to load documents and print them
///
/// One renderer instance serves a whole run. Handles are opened, used and
/// closed by the traversal; a handle must not be used after `close`.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// An open document
    type Handle: Send;

    /// Open a new page and navigate it to `url`
    async fn open(&self, url: &str) -> Result<Self::Handle>;

    /// Suspend until network activity on the page has settled
    async fn wait_until_network_idle(&self, handle: &mut Self::Handle) -> Result<()>;

    /// Absolute `href` of every anchor on the page, in document order
    async fn extract_links(&self, handle: &mut Self::Handle) -> Result<Vec<String>>;

    /// Print the loaded document to PDF bytes
    async fn capture_document(
        &self,
        handle: &mut Self::Handle,
        layout: &PdfLayout,
    ) -> Result<Vec<u8>>;

    /// Release the page
    async fn close(&self, handle: Self::Handle) -> Result<()>;

    /// Release the engine itself
    async fn shutdown(self) -> Result<()>
    where
        Self: Sized;
}
