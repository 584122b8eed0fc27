//! Request path normalization.

use std::borrow::Cow;

/// Normalizes a raw request path for matching.
///
/// Returns `None` for paths that can never match: the empty string and
/// paths without a leading `/`. A single trailing `/` is trimmed, except
/// for the root path itself.
///
/// # Example
///
/// ```
/// use axiom_routing::normalize_path;
///
/// assert_eq!(normalize_path("/users/"), Some("/users"));
/// assert_eq!(normalize_path("/"), Some("/"));
/// assert_eq!(normalize_path(""), None);
/// ```
pub fn normalize_path(path: &str) -> Option<&str> {
    if !path.starts_with('/') {
        return None;
    }
    if path.len() > 1 {
        Some(path.strip_suffix('/').unwrap_or(path))
    } else {
        Some(path)
    }
}

/// Splits a normalized path into its raw segments. The root path has none.
pub(crate) fn split_segments(normalized: &str) -> Vec<&str> {
    match &normalized[1..] {
        "" => Vec::new(),
        rest => rest.split('/').collect(),
    }
}

/// Percent-decodes a captured segment, keeping the raw text when the
/// escapes do not form valid UTF-8.
pub(crate) fn decode_segment(segment: &str) -> Cow<'_, str> {
    if !segment.contains('%') {
        return Cow::Borrowed(segment);
    }
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}
