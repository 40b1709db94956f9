//! Export orchestration
//!
//! Runs one export end to end: prepares the working directory, walks the
//! link graph with a single renderer, merges the intermediates and releases
//! the renderer on every exit path. The run timeout bounds the traversal
//! only.

use log::{info, warn};
use std::time::{Duration, Instant};

use super::crawl_types::{ExportError, ExportOutcome, ExportResult, MergeReport};
use super::progress::{LogProgress, ProgressReporter};
use super::traversal::{Traversal, TraversalSettings};
use super::workspace::{prepare_working_dir, remove_all_intermediates, remove_intermediates};
use crate::config::ExportConfig;
use crate::page_renderer::{ChromiumRenderer, PageRenderer};
use crate::pdf_assembler::merge;

/// Export with a Chromium renderer, logging progress
pub async fn export(config: ExportConfig) -> ExportResult<ExportOutcome> {
    let renderer = ChromiumRenderer::launch(&config)
        .await
        .map_err(ExportError::Browser)?;
    export_with(&config, renderer, &LogProgress).await
}

/// Export with the given renderer
///
/// The renderer is shut down before this returns, whatever the outcome. On
/// failure no intermediates are left in the working directory.
pub async fn export_with<R, P>(
    config: &ExportConfig,
    renderer: R,
    progress: &P,
) -> ExportResult<ExportOutcome>
where
    R: PageRenderer,
    P: ProgressReporter + ?Sized,
{
    let start_time = Instant::now();
    let mut traversal = Traversal::new(TraversalSettings::from_config(config));

    let result = run(config, &renderer, progress, &mut traversal).await;

    if let Err(e) = renderer.shutdown().await {
        warn!(target: "html2pdf::orchestrator", "Renderer shutdown failed: {e:#}");
    }

    let merge_report = match result {
        Ok(report) => report,
        Err(e) => {
            progress.report_error(&e.to_string());
            remove_intermediates(config.working_dir(), traversal.discovery_order()).await;
            remove_all_intermediates(config.working_dir()).await;
            return Err(e);
        }
    };

    let traversal_report = traversal.report();
    info!(
        target: "html2pdf::orchestrator",
        "Exported {} documents ({} pages) in {:.2}s",
        merge_report.merged.len(),
        merge_report.page_count,
        start_time.elapsed().as_secs_f64()
    );
    progress.report_completed(&merge_report.export_path);

    Ok(ExportOutcome {
        export_path: merge_report.export_path,
        documents: merge_report.merged.len(),
        page_count: merge_report.page_count,
        truncated: traversal_report.truncated,
        failed: traversal_report.failed,
        missing: merge_report.missing,
    })
}

async fn run<R, P>(
    config: &ExportConfig,
    renderer: &R,
    progress: &P,
    traversal: &mut Traversal,
) -> ExportResult<MergeReport>
where
    R: PageRenderer,
    P: ProgressReporter + ?Sized,
{
    let working_dir = config.working_dir();
    prepare_working_dir(working_dir, config.export_file_name()).await?;

    info!(
        target: "html2pdf::orchestrator",
        "Exporting {} into {}",
        config.entry_url(),
        working_dir.display()
    );

    let traversed = traversal.visit(renderer, progress, config.entry_url());
    match config.run_timeout_secs() {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), traversed)
            .await
            .map_err(|_| ExportError::Timeout { secs })??,
        None => traversed.await?,
    }

    // The merge runs on a blocking thread and is never cut short
    let order = traversal.discovery_order().to_vec();
    progress.report_merge_started(order.len());
    merge(&order, working_dir, config.export_file_name()).await
}
