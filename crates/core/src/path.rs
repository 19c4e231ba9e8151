//! Property path resolution
//!
//! Paths are dotted (`user.username`) and may use bracket segments
//! (`images[thumbnail].url`). Bracket segments are rewritten to dotted form
//! before the path is split, so `a[b]` and `a.b` address the same value.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static BRACKET_SEGMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(\w+)\]").unwrap());

/// Split a path into its segment names.
pub fn parse_path(path: &str) -> Vec<String> {
    BRACKET_SEGMENT
        .replace_all(path, ".$1")
        .split('.')
        .map(str::to_string)
        .collect()
}

/// Resolve `path` against `root`.
///
/// Returns `None` as soon as a segment is absent or the current value is
/// `null`. Segments are property names; on arrays a segment selects an element
/// only when it is the canonical decimal form of an in-bounds index.
///
/// Only values present in the JSON are addressable: derived properties such
/// as the `length` of an array or string resolve to `None`.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    resolve_segments(root, &parse_path(path))
}

/// Resolve an already parsed path.
pub fn resolve_segments<'a, S: AsRef<str>>(root: &'a Value, segments: &[S]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |current, segment| step(current, segment.as_ref()))
}

fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => array_index(segment).and_then(|index| items.get(index)),
        _ => None,
    }
}

fn array_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || (segment.len() > 1 && segment.starts_with('0')) {
        return None;
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
