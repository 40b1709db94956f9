//! Browser-side page operations
//!
//! Link extraction, viewport setup, network-idle detection and PDF printing
//! for chromiumoxide pages.

use super::js_scripts::LINKS_SCRIPT;
use crate::config::{NetworkIdle, PdfLayout, Viewport};
use anyhow::{Context, Result};
use chromiumoxide::Page;
use chromiumoxide::cdp;
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::listeners::EventStream;
use futures::{Stream, StreamExt};
use std::collections::HashSet;
use std::time::Duration;

/// Request ids seen on one page, split into in flight and settled
///
/// The three network events arrive on separate streams, so a request's
/// `LoadingFinished` can be drained before its `RequestWillBeSent`. A settled
/// id is never counted as in flight again.
#[derive(Debug, Default)]
struct InflightRequests {
    inflight: HashSet<String>,
    settled: HashSet<String>,
}

impl InflightRequests {
    fn started(&mut self, id: &str) {
        if !self.settled.contains(id) {
            self.inflight.insert(id.to_string());
        }
    }

    fn settled(&mut self, id: &str) {
        self.inflight.remove(id);
        self.settled.insert(id.to_string());
    }

    fn len(&self) -> usize {
        self.inflight.len()
    }
}

/// Tracks requests in flight on one page
///
/// Listeners are registered before navigation starts so that no request of
/// the document load is missed; events buffer in the streams until
/// [`wait_for_network_idle`] drains them.
pub struct NetworkTracker {
    started: EventStream<EventRequestWillBeSent>,
    finished: EventStream<EventLoadingFinished>,
    failed: EventStream<EventLoadingFailed>,
    requests: InflightRequests,
}

impl NetworkTracker {
    /// Subscribe to the network events of `page`
    pub async fn attach(page: &Page) -> Result<Self> {
        let started = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .context("Failed to listen for RequestWillBeSent")?;
        let finished = page
            .event_listener::<EventLoadingFinished>()
            .await
            .context("Failed to listen for LoadingFinished")?;
        let failed = page
            .event_listener::<EventLoadingFailed>()
            .await
            .context("Failed to listen for LoadingFailed")?;

        Ok(Self {
            started,
            finished,
            failed,
            requests: InflightRequests::default(),
        })
    }
}

/// Wait until the page has at most `max_inflight` requests for a full window
///
/// Each network event restarts the settling window. If the page never
/// settles within `max_wait_secs` the wait gives up and the page is treated as
/// loaded; a document that keeps polling must still be printable.
pub async fn wait_for_network_idle(tracker: &mut NetworkTracker, idle: NetworkIdle) -> Result<()> {
    let started = (&mut tracker.started).map(|e| e.request_id.inner().clone());
    let finished = (&mut tracker.finished).map(|e| e.request_id.inner().clone());
    let failed = (&mut tracker.failed).map(|e| e.request_id.inner().clone());

    settle(
        started,
        futures::stream::select(finished, failed),
        &mut tracker.requests,
        idle,
    )
    .await;
    Ok(())
}

/// Drain request ids until the page settles or `max_wait_secs` elapses
async fn settle<S, F>(
    mut started: S,
    mut settled: F,
    requests: &mut InflightRequests,
    idle: NetworkIdle,
) -> Duration
where
    S: Stream<Item = String> + Unpin,
    F: Stream<Item = String> + Unpin,
{
    let start = tokio::time::Instant::now();
    let deadline = start + Duration::from_secs(idle.max_wait_secs);
    let window = Duration::from_millis(idle.idle_window_ms);

    loop {
        let quiet = requests.len() <= idle.max_inflight;

        tokio::select! {
            Some(id) = started.next() => requests.started(&id),
            Some(id) = settled.next() => requests.settled(&id),
            () = tokio::time::sleep(window), if quiet => {
                log::debug!(
                    target: "html2pdf::render",
                    "Network idle after {:.2}s ({} in flight)",
                    start.elapsed().as_secs_f64(),
                    requests.len()
                );
                return start.elapsed();
            }
            () = tokio::time::sleep_until(deadline) => {
                log::warn!(
                    target: "html2pdf::render",
                    "Network still busy after {}s ({} in flight), proceeding anyway",
                    idle.max_wait_secs,
                    requests.len()
                );
                return start.elapsed();
            }
        }
    }
}

/// Set fixed window metrics for consistent desktop rendering
pub async fn apply_viewport(page: &Page, viewport: Viewport) -> Result<()> {
    page.execute(
        cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(viewport.width))
            .height(i64::from(viewport.height))
            .device_scale_factor(viewport.device_scale_factor)
            .mobile(false)
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await
    .context("Failed to apply viewport")?;
    Ok(())
}

/// Extract the resolved `href` of every anchor, in document order
pub async fn extract_links(page: &Page) -> Result<Vec<String>> {
    let js_result = page
        .evaluate(LINKS_SCRIPT)
        .await
        .context("Failed to execute links extraction script")?;

    let links: Vec<String> = js_result
        .into_value()
        .context("Failed to parse links from JS result")?;

    Ok(links)
}

fn print_params(layout: &PdfLayout) -> PrintToPdfParams {
    PrintToPdfParams {
        landscape: Some(layout.landscape),
        display_header_footer: Some(layout.display_header_footer),
        print_background: Some(layout.print_background),
        paper_width: Some(layout.paper_width_in),
        paper_height: Some(layout.paper_height_in),
        margin_top: Some(layout.margin_top_in),
        margin_bottom: Some(layout.margin_bottom_in),
        margin_left: Some(layout.margin_left_in),
        margin_right: Some(layout.margin_right_in),
        header_template: Some(layout.header_template.clone()),
        footer_template: Some(layout.footer_template.clone()),
        ..Default::default()
    }
}

/// Print the loaded document with `layout`
pub async fn print_pdf(page: &Page, layout: &PdfLayout) -> Result<Vec<u8>> {
    let bytes = page
        .pdf(print_params(layout))
        .await
        .context("Page.printToPDF failed")?;

    if bytes.is_empty() {
        anyhow::bail!("Page.printToPDF returned an empty document");
    }
    Ok(bytes)
}
