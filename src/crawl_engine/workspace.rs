//! Working-directory lifecycle
//!
//! Intermediate artifacts are named `<index>.pdf`. Only files matching that
//! pattern (and the previous export) are ever deleted from the working
//! directory; anything else a caller keeps there is left alone.

use log::{debug, warn};
use std::path::Path;

use super::crawl_types::{ExportError, ExportResult};
use crate::utils::ARTIFACT_EXTENSION;

/// File name of the intermediate artifact with the given index
#[must_use]
pub fn artifact_file_name(index: usize) -> String {
    format!("{index}.{ARTIFACT_EXTENSION}")
}

/// Whether `name` is an intermediate artifact (`^\d+\.pdf$`)
#[must_use]
pub fn is_intermediate_artifact(name: &str) -> bool {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return false;
    };
    ext == ARTIFACT_EXTENSION && !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit())
}

/// Temporary name the export is written under before it is moved into place
#[must_use]
pub fn partial_export_name(export_file_name: &str) -> String {
    format!(".{export_file_name}.partial")
}

/// Create the working directory and clear what a previous run left behind
///
/// Removes stale intermediates, the previous export and any half-written
/// export so that a failed run can never be mistaken for a fresh result.
pub async fn prepare_working_dir(dir: &Path, export_file_name: &str) -> ExportResult<()> {
    let map_err = |source| ExportError::WorkingDir {
        path: dir.to_path_buf(),
        source,
    };

    tokio::fs::create_dir_all(dir).await.map_err(map_err)?;
    let partial = partial_export_name(export_file_name);

    let mut entries = tokio::fs::read_dir(dir).await.map_err(map_err)?;
    let mut removed = 0usize;
    while let Some(entry) = entries.next_entry().await.map_err(map_err)? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !(is_intermediate_artifact(name) || name == export_file_name || name == partial) {
            continue;
        }
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        tokio::fs::remove_file(entry.path()).await.map_err(map_err)?;
        removed += 1;
    }

    if removed > 0 {
        debug!(
            target: "html2pdf::workspace",
            "Removed {removed} stale files from {}",
            dir.display()
        );
    }
    Ok(())
}

/// Delete the named intermediates, ignoring ones that do not exist
///
/// Best-effort: failures are logged, never returned.
pub async fn remove_intermediates(dir: &Path, names: &[String]) {
    for name in names {
        let path = dir.join(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(
                    target: "html2pdf::workspace",
                    "Failed to remove intermediate {}: {e}",
                    path.display()
                );
            }
        }
    }
}

/// Delete every intermediate currently in `dir`, whatever run produced it
pub async fn remove_all_intermediates(dir: &Path) {
    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return;
    };
    let mut names = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        if let Some(name) = entry.file_name().to_str()
            && is_intermediate_artifact(name)
        {
            names.push(name.to_string());
        }
    }
    remove_intermediates(dir, &names).await;
}
