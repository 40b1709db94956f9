//! JavaScript evaluation scripts
//!
//! This module contains the JavaScript code evaluated inside loaded pages.

/// Resolved `href` of every anchor in document order
///
/// `a.href` is already absolute (resolved against the document base), so a
/// relative link in an export yields a `file://` URL. Anchors without an
/// `href` attribute resolve to an empty string and are dropped here.
pub const LINKS_SCRIPT: &str = r"
    (() => {
        return Array.from(document.querySelectorAll('a'))
            .map(a => a.href)
            .filter(href => typeof href === 'string' && href.length > 0);
    })()
";

