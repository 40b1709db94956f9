//! Depth-first traversal over the link graph of an export
//!
//! The traversal owns the visited registry, the discovery order and the
//! artifact counter for one run. It walks the graph with an explicit stack:
//!
//! - a URL is registered and appended to the discovery order the moment it is
//!   first discovered, before any of its children are looked at;
//! - a document is captured only when all of its in-scope links have been
//!   processed, so children always finish before their parent prints.
//!
//! Parents stay open on the stack while a child subtree runs; only the page
//! on top of the stack is ever navigated, waited on or printed.

use anyhow::Context;
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use super::crawl_types::{ExportError, ExportResult, TraversalReport};
use super::link_processor::{in_scope_links, normalize_url};
use super::progress::ProgressReporter;
use super::workspace::artifact_file_name;
use crate::config::{CapPolicy, ExportConfig, FailurePolicy, PdfLayout};
use crate::page_renderer::PageRenderer;

/// Settings the traversal needs from the export configuration
#[derive(Debug, Clone)]
pub struct TraversalSettings {
    pub working_dir: PathBuf,
    pub max_pages: usize,
    pub cap_policy: CapPolicy,
    pub failure_policy: FailurePolicy,
    pub layout: PdfLayout,
}

impl TraversalSettings {
    #[must_use]
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            working_dir: config.working_dir().to_path_buf(),
            max_pages: config.max_pages(),
            cap_policy: config.cap_policy(),
            failure_policy: config.failure_policy(),
            layout: config.pdf_layout().clone(),
        }
    }
}

/// A document whose links are still being walked
struct Frame<H> {
    url: String,
    index: usize,
    file_name: String,
    handle: H,
    links: std::vec::IntoIter<String>,
}

/// Traversal state for one export run
#[derive(Debug)]
pub struct Traversal {
    settings: TraversalSettings,
    /// Normalized URL to artifact file name
    registry: HashMap<String, String>,
    /// Artifact file names in discovery order
    order: Vec<String>,
    next_index: usize,
    captured: usize,
    dropped: HashSet<String>,
    failed: Vec<String>,
}

impl Traversal {
    #[must_use]
    pub fn new(settings: TraversalSettings) -> Self {
        Self {
            settings,
            registry: HashMap::new(),
            order: Vec::new(),
            next_index: 0,
            captured: 0,
            dropped: HashSet::new(),
            failed: Vec::new(),
        }
    }

    /// Artifact file names registered so far, in merge order
    #[must_use]
    pub fn discovery_order(&self) -> &[String] {
        &self.order
    }

    /// Artifact file name assigned to `url`, if it was discovered
    #[must_use]
    pub fn artifact_for(&self, url: &str) -> Option<&str> {
        let key = normalize_url(url).ok()?;
        self.registry.get(&key).map(String::as_str)
    }

    #[must_use]
    pub fn report(&self) -> TraversalReport {
        TraversalReport {
            discovery_order: self.order.clone(),
            captured: self.captured,
            truncated: self.dropped.len(),
            failed: self.failed.clone(),
        }
    }

    /// Discover `url` and everything reachable from it
    ///
    /// A URL that is already registered is a no-op. Under
    /// `FailurePolicy::Abort` the first load or capture failure is returned
    /// after every page still open on the stack has been closed.
    pub async fn visit<R, P>(&mut self, renderer: &R, progress: &P, url: &str) -> ExportResult<()>
    where
        R: PageRenderer,
        P: ProgressReporter + ?Sized,
    {
        let url = normalize_url(url).map_err(|source| ExportError::Navigation {
            url: url.to_string(),
            source,
        })?;

        let mut stack: Vec<Frame<R::Handle>> = Vec::new();
        let result = match self.enter(renderer, progress, url).await {
            Ok(Some(frame)) => {
                stack.push(frame);
                self.drive(renderer, progress, &mut stack).await
            }
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        };

        if result.is_err() {
            for frame in stack.into_iter().rev() {
                if let Err(e) = renderer.close(frame.handle).await {
                    warn!(
                        target: "html2pdf::traversal",
                        "Failed to close page for {} during unwind: {e:#}",
                        frame.url
                    );
                }
            }
        }

        result
    }

    async fn drive<R, P>(
        &mut self,
        renderer: &R,
        progress: &P,
        stack: &mut Vec<Frame<R::Handle>>,
    ) -> ExportResult<()>
    where
        R: PageRenderer,
        P: ProgressReporter + ?Sized,
    {
        while let Some(top) = stack.last_mut() {
            if let Some(link) = top.links.next() {
                if self.registry.contains_key(&link) {
                    debug!(target: "html2pdf::traversal", "Already visited {link}! Skipping...");
                    continue;
                }
                if let Some(frame) = self.enter(renderer, progress, link).await? {
                    stack.push(frame);
                }
                continue;
            }

            let Some(frame) = stack.pop() else {
                break;
            };
            self.leave(renderer, progress, frame).await?;
        }
        Ok(())
    }

    /// Register `url`, load it and collect its in-scope links
    ///
    /// Returns `None` when the URL is a duplicate, was dropped by the cap, or
    /// failed under `FailurePolicy::SkipBranch`.
    async fn enter<R, P>(
        &mut self,
        renderer: &R,
        progress: &P,
        url: String,
    ) -> ExportResult<Option<Frame<R::Handle>>>
    where
        R: PageRenderer,
        P: ProgressReporter + ?Sized,
    {
        if self.registry.contains_key(&url) {
            return Ok(None);
        }

        if self.next_index >= self.settings.max_pages {
            return self.on_cap_reached(progress, url).map(|()| None);
        }

        let index = self.next_index;
        let file_name = artifact_file_name(index);
        self.registry.insert(url.clone(), file_name.clone());
        self.order.push(file_name.clone());
        self.next_index += 1;
        progress.report_page_discovered(index, &url);

        let mut handle = match renderer.open(&url).await {
            Ok(handle) => handle,
            Err(source) => {
                return self
                    .on_page_failed(progress, ExportError::Navigation { url, source })
                    .map(|()| None);
            }
        };

        let loaded = async {
            renderer.wait_until_network_idle(&mut handle).await?;
            renderer.extract_links(&mut handle).await
        }
        .await;

        match loaded {
            Ok(raw_links) => {
                let links = in_scope_links(&raw_links);
                debug!(
                    target: "html2pdf::traversal",
                    "Found {} links on {url}, {} in scope",
                    raw_links.len(),
                    links.len()
                );
                Ok(Some(Frame {
                    url,
                    index,
                    file_name,
                    handle,
                    links: links.into_iter(),
                }))
            }
            Err(source) => {
                self.close_quietly(renderer, handle, &url).await;
                self.on_page_failed(progress, ExportError::Navigation { url, source })
                    .map(|()| None)
            }
        }
    }

    /// Capture a document whose children are all done, then release its page
    async fn leave<R, P>(&mut self, renderer: &R, progress: &P, frame: Frame<R::Handle>) -> ExportResult<()>
    where
        R: PageRenderer,
        P: ProgressReporter + ?Sized,
    {
        let Frame {
            url,
            index,
            file_name,
            mut handle,
            ..
        } = frame;

        let path = self.settings.working_dir.join(&file_name);
        let captured = async {
            let bytes = renderer
                .capture_document(&mut handle, &self.settings.layout)
                .await?;
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            anyhow::Ok(bytes.len())
        }
        .await;

        self.close_quietly(renderer, handle, &url).await;

        match captured {
            Ok(size) => {
                self.captured += 1;
                debug!(
                    target: "html2pdf::traversal",
                    "Saved {file_name} ({size} bytes) for {url}"
                );
                progress.report_page_captured(index, &url);
                Ok(())
            }
            Err(source) => self.on_page_failed(progress, ExportError::Capture { url, source }),
        }
    }

    async fn close_quietly<R: PageRenderer>(&self, renderer: &R, handle: R::Handle, url: &str) {
        if let Err(e) = renderer.close(handle).await {
            warn!(target: "html2pdf::traversal", "Failed to close page for {url}: {e:#}");
        }
    }

    fn on_cap_reached<P>(&mut self, progress: &P, url: String) -> ExportResult<()>
    where
        P: ProgressReporter + ?Sized,
    {
        let cap = self.settings.max_pages;
        match self.settings.cap_policy {
            CapPolicy::Ignore => {
                self.dropped.insert(url);
                Ok(())
            }
            CapPolicy::Warn => {
                if self.dropped.insert(url.clone()) {
                    warn!(
                        target: "html2pdf::traversal",
                        "Page cap of {cap} reached, {url} will not be exported"
                    );
                    progress.report_cap_reached(cap, &url);
                }
                Ok(())
            }
            CapPolicy::Fail => Err(ExportError::CapacityExceeded { cap, url }),
        }
    }

    fn on_page_failed<P>(&mut self, progress: &P, error: ExportError) -> ExportResult<()>
    where
        P: ProgressReporter + ?Sized,
    {
        match self.settings.failure_policy {
            FailurePolicy::Abort => Err(error),
            FailurePolicy::SkipBranch => {
                info!(target: "html2pdf::traversal", "Skipping branch: {error}");
                progress.report_error(&error.to_string());
                self.failed
                    .push(error.url().unwrap_or_default().to_string());
                Ok(())
            }
        }
    }
}
