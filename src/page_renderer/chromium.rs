//! Chromium-backed renderer driven over CDP

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::{Browser, Page};
use log::{debug, warn};
use std::path::PathBuf;
use tokio::task::JoinHandle;

use super::PageRenderer;
use crate::browser_setup::launch_browser;
use crate::config::{ExportConfig, NetworkIdle, PdfLayout, Viewport};
use crate::crawl_engine::cleanup::{CleanupResult, cleanup_browser_and_data};
use crate::crawl_engine::page_timeout::with_page_timeout;
use crate::page_extractor::{NetworkTracker, apply_viewport, extract_links, print_pdf, wait_for_network_idle};

/// An open Chromium tab and the network listeners attached to it
pub struct ChromiumPage {
    page: Page,
    url: String,
    tracker: NetworkTracker,
}

/// Renderer owning one Chromium process for the duration of a run
pub struct ChromiumRenderer {
    browser: Option<Browser>,
    handler_task: Option<JoinHandle<()>>,
    chrome_data_dir: PathBuf,
    viewport: Viewport,
    network_idle: NetworkIdle,
    page_load_timeout_secs: u64,
    capture_timeout_secs: u64,
}

impl ChromiumRenderer {
    /// Launch the browser with the settings in `config`
    pub async fn launch(config: &ExportConfig) -> Result<Self> {
        let (browser, handler_task, chrome_data_dir) = launch_browser(
            config.headless(),
            config.chrome_data_dir().cloned(),
            config.viewport(),
        )
        .await?;

        debug!(
            target: "html2pdf::render",
            "Browser ready, profile at {}",
            chrome_data_dir.display()
        );

        Ok(Self {
            browser: Some(browser),
            handler_task: Some(handler_task),
            chrome_data_dir,
            viewport: config.viewport(),
            network_idle: config.network_idle(),
            page_load_timeout_secs: config.page_load_timeout_secs(),
            capture_timeout_secs: config.capture_timeout_secs(),
        })
    }

    fn browser(&self) -> Result<&Browser> {
        self.browser
            .as_ref()
            .context("Browser has already been shut down")
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    type Handle = ChromiumPage;

    async fn open(&self, url: &str) -> Result<ChromiumPage> {
        let page = self
            .browser()?
            .new_page("about:blank")
            .await
            .context("Failed to create page")?;

        apply_viewport(&page, self.viewport).await?;

        // Listeners go in before navigation so the load's own requests count.
        let tracker = NetworkTracker::attach(&page).await?;

        let navigated = with_page_timeout(
            async {
                page.goto(url)
                    .await
                    .with_context(|| format!("Navigation to {url} failed"))?;
                Ok(())
            },
            self.page_load_timeout_secs,
            "Page navigation",
        )
        .await;

        if let Err(e) = navigated {
            if let Err(close_err) = page.close().await {
                warn!(target: "html2pdf::render", "Failed to close page for {url}: {close_err}");
            }
            return Err(e);
        }

        Ok(ChromiumPage {
            page,
            url: url.to_string(),
            tracker,
        })
    }

    async fn wait_until_network_idle(&self, handle: &mut ChromiumPage) -> Result<()> {
        wait_for_network_idle(&mut handle.tracker, self.network_idle).await
    }

    async fn extract_links(&self, handle: &mut ChromiumPage) -> Result<Vec<String>> {
        extract_links(&handle.page).await
    }

    async fn capture_document(
        &self,
        handle: &mut ChromiumPage,
        layout: &PdfLayout,
    ) -> Result<Vec<u8>> {
        with_page_timeout(
            print_pdf(&handle.page, layout),
            self.capture_timeout_secs,
            "PDF capture",
        )
        .await
    }

    async fn close(&self, handle: ChromiumPage) -> Result<()> {
        let ChromiumPage { page, url, .. } = handle;
        page.close()
            .await
            .with_context(|| format!("Failed to close page for {url}"))
    }

    async fn shutdown(mut self) -> Result<()> {
        let result = match self.browser.take() {
            Some(browser) => cleanup_browser_and_data(browser, &self.chrome_data_dir).await,
            None => CleanupResult::Success,
        };

        if let Some(task) = self.handler_task.take() {
            task.abort();
        }

        match result {
            CleanupResult::Success => Ok(()),
            CleanupResult::PartialFailure(errors) => {
                anyhow::bail!("Browser cleanup incomplete: {}", errors.join("; "))
            }
        }
    }
}

impl Drop for ChromiumRenderer {
    fn drop(&mut self) {
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        // Only reached when shutdown never ran; the process dies with the
        // handler, the profile directory has to go by hand.
        if self.browser.take().is_some()
            && let Err(e) = std::fs::remove_dir_all(&self.chrome_data_dir)
        {
            warn!(
                target: "html2pdf::render",
                "Failed to remove Chrome data directory {}: {e}",
                self.chrome_data_dir.display()
            );
        }
    }
}
