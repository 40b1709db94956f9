//! Merges the intermediate PDFs of a run into the export
//!
//! Pages land in the export in discovery order, never in file-system or
//! capture order. Intermediates that are missing on disk are skipped; every
//! intermediate named in the order is deleted once the merge is over,
//! whether it succeeded or not. The export is written under a temporary
//! name and renamed into place, so it never exists half written.

pub mod page_tree;

pub use page_tree::PageTreeBuilder;

use anyhow::{Context, Result};
use log::{debug, warn};
use lopdf::Document;
use std::path::{Path, PathBuf};

use crate::crawl_engine::crawl_types::{ExportError, ExportResult, MergeReport};
use crate::crawl_engine::workspace::{partial_export_name, remove_intermediates};

/// Merge the intermediates named in `order` into `working_dir/export_name`
///
/// Any previous export at that path is overwritten.
pub async fn merge(
    order: &[String],
    working_dir: &Path,
    export_name: &str,
) -> ExportResult<MergeReport> {
    let export_path = working_dir.join(export_name);

    let assembled = {
        let order = order.to_vec();
        let working_dir = working_dir.to_path_buf();
        let export_path = export_path.clone();
        tokio::task::spawn_blocking(move || assemble(&order, &working_dir, &export_path)).await
    };

    remove_intermediates(working_dir, order).await;

    let report = match assembled {
        Ok(result) => result,
        Err(join_error) => Err(anyhow::Error::new(join_error).context("Merge task failed")),
    };

    report.map_err(|source| ExportError::Assembly {
        path: export_path,
        source,
    })
}

fn assemble(order: &[String], working_dir: &Path, export_path: &Path) -> Result<MergeReport> {
    let mut builder = PageTreeBuilder::new();
    let mut merged = Vec::new();
    let mut missing = Vec::new();

    for name in order {
        let path = working_dir.join(name);
        if !path.is_file() {
            warn!(
                target: "html2pdf::assembler",
                "{} not found, skipping",
                path.display()
            );
            missing.push(name.clone());
            continue;
        }

        let document = Document::load(&path)
            .with_context(|| format!("Failed to parse intermediate {}", path.display()))?;
        let added = builder.append(document);
        debug!(target: "html2pdf::assembler", "Appended {added} pages from {name}");
        merged.push(name.clone());
    }

    let page_count = builder.page_count();
    if page_count == 0 {
        warn!(
            target: "html2pdf::assembler",
            "None of the {} intermediates contributed a page, writing an empty export",
            order.len()
        );
    }
    let mut output = builder.finish()?;

    let partial = partial_path(export_path);
    if let Err(e) = write_export(&mut output, &partial, export_path) {
        let _ = std::fs::remove_file(&partial);
        return Err(e);
    }

    Ok(MergeReport {
        export_path: PathBuf::from(export_path),
        merged,
        missing,
        page_count,
    })
}

fn write_export(output: &mut Document, partial: &Path, export_path: &Path) -> Result<()> {
    output
        .save(partial)
        .with_context(|| format!("Failed to write {}", partial.display()))?;
    std::fs::rename(partial, export_path)
        .with_context(|| format!("Failed to move the export into {}", export_path.display()))?;
    Ok(())
}

fn partial_path(export_path: &Path) -> PathBuf {
    let name = export_path
        .file_name()
        .map(|n| partial_export_name(&n.to_string_lossy()))
        .unwrap_or_else(|| partial_export_name("export"));
    export_path.with_file_name(name)
}
