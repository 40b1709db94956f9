//! URL and path utilities for locating the entry document.
//!
//! An exported knowledge base is a directory tree of HTML files. These helpers
//! turn a user-supplied path into the `file://` entry URL the exporter needs.

use anyhow::{Context, Result, anyhow, bail};
use jwalk::WalkDir;
use std::path::{Path, PathBuf};
use url::Url;

use super::constants::DOCUMENT_EXTENSION;

/// Convert a filesystem path to an absolute `file://` URL
pub fn entry_url_from_path(path: &Path) -> Result<Url> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("Failed to resolve path {}", path.display()))?;
    Url::from_file_path(&absolute)
        .map_err(|()| anyhow!("Cannot express {} as a file URL", absolute.display()))
}

fn has_document_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
}

/// List every HTML file below `root`, as paths relative to `root`, sorted
pub fn find_html_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort(true) {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if has_document_extension(&path) {
            let relative = path.strip_prefix(root).unwrap_or(path.as_path()).to_path_buf();
            found.push(relative);
        }
    }
    found.sort();
    Ok(found)
}

/// Pick the entry document for a file or an extracted export directory
///
/// - A file is used as-is, provided it is an HTML document.
/// - For a directory, the alphabetically first HTML file at its root wins.
/// - A directory whose HTML files all live in subdirectories is ambiguous;
///   the error lists the candidates so the caller can pass one explicitly.
pub fn resolve_entry(path: &Path) -> Result<Url> {
    if path.is_file() {
        if !has_document_extension(path) {
            bail!("Entry file {} is not an .html document", path.display());
        }
        return entry_url_from_path(path);
    }

    if !path.is_dir() {
        bail!("Entry path {} does not exist", path.display());
    }

    let mut root_documents: Vec<PathBuf> = std::fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && has_document_extension(p))
        .collect();
    root_documents.sort();

    if let Some(first) = root_documents.first() {
        log::info!(target: "html2pdf::entry", "Selected entry document {}", first.display());
        return entry_url_from_path(first);
    }

    let nested = find_html_files(path)?;
    if nested.is_empty() {
        bail!("No HTML files found in {}", path.display());
    }

    let listing = nested
        .iter()
        .map(|p| format!("  {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    bail!(
        "No HTML file at the root of {}; pass one of these explicitly:\n{listing}",
        path.display()
    )
}
