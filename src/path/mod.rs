//! Path joining and normalization.
//!
//! Collapses a sequence of path segments (possibly absolute, possibly using
//! `.`/`..`/`...` ancestor markers) into a canonical slash-separated path.

mod error;

pub use error::PathError;

/// Joins path segments into one canonical `/`-separated path.
///
/// Each input may itself contain `/`; OS-specific separators are normalized
/// first. Only the first input may establish an absolute prefix (a leading
/// `/`, or a `X:/` drive form); a leading `/` on a later input is treated as
/// root-relative continuation and stripped. `.` segments are dropped and `..`
/// segments resolve against prior segments where possible.
///
/// Returns [`PathError::RootParent`] when `..` would walk above an absolute
/// root. Relative walks above the starting point are preserved literally:
/// `join_path(["a", "..", ".."])` is `".."`.
pub fn join_path<I, S>(segments: I) -> Result<String, PathError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parts: Vec<String> = segments
        .into_iter()
        .map(|s| normalize_separators(s.as_ref()))
        .collect();

    let mut abs_prefix = String::new();
    if let Some(first) = parts.first_mut() {
        if first.starts_with('/') {
            abs_prefix.push('/');
            *first = first[1..].to_string();
        } else if has_drive_prefix(first) {
            abs_prefix = first[..3].to_string();
            *first = first[3..].to_string();
        }
    }

    let mut scrubbed: Vec<String> = Vec::new();
    for (i, p) in parts.iter().enumerate() {
        for segment in scrub(i, p).split('/') {
            scrubbed.push(segment.to_string());
        }
    }

    let mut simpler: Vec<String> = Vec::new();
    for s in scrubbed {
        if s == "." {
            // dropped
        } else if s == ".." {
            let last_is_parent = matches!(simpler.last(), Some(last) if last == "..");
            if !simpler.is_empty() && !last_is_parent {
                simpler.pop();
            } else if simpler.is_empty() && !abs_prefix.is_empty() {
                return Err(PathError::RootParent);
            } else {
                simpler.push(s);
            }
        } else {
            simpler.push(s);
        }
    }

    if simpler.is_empty() {
        if abs_prefix.is_empty() {
            Ok(".".to_string())
        } else {
            Ok(abs_prefix)
        }
    } else {
        Ok(abs_prefix + &simpler.join("/"))
    }
}

/// Expands the `.../` ancestor shorthand: each application turns `.../` into
/// `../../`, so `N` dots followed by `/` yield `N-1` parent levels.
pub(crate) fn expand_ancestor_dots(path: &str) -> String {
    let mut out = path.to_string();
    while out.contains(".../") {
        out = out.replace(".../", "../../");
    }
    out
}

/// Replace the platform separator with `/` (no-op where it already is `/`).
pub(crate) fn normalize_separators(path: &str) -> String {
    if std::path::MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Recognizes a `X:/` drive form at the start of a path.
pub(crate) fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

/// Per-input cleanup before splitting on `/`.
///
/// Empty string and `/` become `.`; one trailing `/` is stripped; the `.../`
/// shorthand is expanded; one leading `/` is stripped on non-first inputs.
fn scrub(i: usize, p: &str) -> String {
    if p.is_empty() || p == "/" {
        return ".".to_string();
    }
    let p = p.strip_suffix('/').unwrap_or(p);
    let p = expand_ancestor_dots(p);
    if i > 0 {
        if let Some(rest) = p.strip_prefix('/') {
            return rest.to_string();
        }
    }
    p
}
