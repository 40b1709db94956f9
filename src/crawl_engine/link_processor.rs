//! Link filtering and normalization
//!
//! Decides which extracted anchors the traversal may recurse into and maps
//! each accepted URL to the key used by the visited registry.

use anyhow::Result;
use std::path::Path;
use url::Url;

use crate::utils::DOCUMENT_EXTENSION;

/// Normalize a URL string by stripping fragment anchors.
///
/// `doc.html#intro` and `doc.html#usage` are the same document and must be
/// rendered once. Query strings are kept.
///
/// # Examples
///
/// ```
/// # use kodegen_tools_html2pdf::crawl_engine::link_processor::normalize_url;
/// let normalized = normalize_url("file:///export/page.html?x=1#section").unwrap();
/// assert_eq!(normalized, "file:///export/page.html?x=1");
/// ```
pub fn normalize_url(url: &str) -> Result<String> {
    let mut parsed = Url::parse(url)
        .map_err(|e| anyhow::anyhow!("Failed to parse URL for normalization: {}", e))?;
    parsed.set_fragment(None);
    Ok(parsed.to_string())
}

/// Whether a link candidate is eligible for recursion
///
/// A candidate is in scope when its scheme is `file` and the extension of its
/// path, with any query string and fragment removed, is `.html` in any case.
#[must_use]
pub fn is_in_scope(url: &str) -> bool {
    let Some(rest) = url.get(..7) else {
        return false;
    };
    if !rest.eq_ignore_ascii_case("file://") {
        return false;
    }

    let without_fragment = url.split('#').next().unwrap_or(url);
    let path_part = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);

    Path::new(path_part)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
}

/// Filter and normalize the anchors of one page, preserving document order
///
/// Out-of-scope and unparseable candidates are dropped. Duplicates within the
/// page are kept; the traversal skips them through the visited registry.
#[must_use]
pub fn in_scope_links(links: &[String]) -> Vec<String> {
    links
        .iter()
        .filter(|link| is_in_scope(link))
        .filter_map(|link| match normalize_url(link) {
            Ok(normalized) => Some(normalized),
            Err(e) => {
                log::debug!(
                    target: "html2pdf::links",
                    "Skipping unparseable link {link}: {e}"
                );
                None
            }
        })
        .collect()
}
