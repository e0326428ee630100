//! Path strings: the only handle callers get for a tree node.
//!
//! A path is the sequence of keys from the root, each escaped and joined with
//! [`DELIMITER`]. The root has the empty path.
//!
//! Escaping:
//! - `~` → `~0`
//! - `/` → `~1`
//! - empty key → `~2`
//!
//! Any other `~` sequence, or a raw empty segment, makes the path malformed.
//!
//! ```
//! use qlist::domain::path::{join, split};
//!
//! let path = join(&join("", "a/b"), "~k");
//! assert_eq!(path, "a~1b/~0k");
//! assert_eq!(split(&path), Some(vec!["a/b".to_string(), "~k".to_string()]));
//! ```

use std::borrow::Cow;

pub const DELIMITER: char = '/';

const ESCAPE: char = '~';
const EMPTY_SEGMENT: &str = "~2";

/// Escapes one key for use as a path segment.
pub fn escape_segment(key: &str) -> Cow<'_, str> {
    if key.is_empty() {
        return Cow::Borrowed(EMPTY_SEGMENT);
    }
    if !key.contains(DELIMITER) && !key.contains(ESCAPE) {
        return Cow::Borrowed(key);
    }
    Cow::Owned(key.replace(ESCAPE, "~0").replace(DELIMITER, "~1"))
}

/// Reverses [`escape_segment`]. Returns `None` for a malformed segment.
pub fn unescape_segment(segment: &str) -> Option<String> {
    if segment.is_empty() {
        return None;
    }
    if segment == EMPTY_SEGMENT {
        return Some(String::new());
    }
    if !segment.contains(ESCAPE) {
        return Some(segment.to_string());
    }

    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push(ESCAPE),
            Some('1') => out.push(DELIMITER),
            _ => return None,
        }
    }
    Some(out)
}

/// Path of the child `key` under `parent`.
pub fn join(parent: &str, key: &str) -> String {
    let segment = escape_segment(key);
    if parent.is_empty() {
        return segment.into_owned();
    }
    let mut path = String::with_capacity(parent.len() + 1 + segment.len());
    path.push_str(parent);
    path.push(DELIMITER);
    path.push_str(&segment);
    path
}

/// Builds a path from unescaped keys, root first.
pub fn from_keys<I, S>(keys: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .fold(String::new(), |path, key| join(&path, key.as_ref()))
}

/// Splits a path into unescaped keys. `""` is the root (no keys).
pub fn split(path: &str) -> Option<Vec<String>> {
    if path.is_empty() {
        return Some(Vec::new());
    }
    path.split(DELIMITER).map(unescape_segment).collect()
}
