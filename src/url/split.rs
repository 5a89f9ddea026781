//! Splitter for the substring after the scheme/host marker.

/// Raw pieces of a URL suffix: path, query, and fragment substrings.
///
/// The query and fragment are still percent-encoded; decoding happens later.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct UrlPieces {
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

/// Splits a URL suffix on the first `?`, then the first `#` of the remainder.
///
/// Used for `file://` and scheme-relative (`//`) forms that the standard
/// parser does not handle, and for scheme-less inputs.
pub(crate) fn split_suffix(suffix: &str) -> UrlPieces {
    match suffix.split_once('?') {
        Some((path, rest)) => match rest.split_once('#') {
            Some((query, fragment)) => UrlPieces {
                path: path.to_string(),
                query: Some(query.to_string()),
                fragment: Some(fragment.to_string()),
            },
            None => UrlPieces {
                path: path.to_string(),
                query: Some(rest.to_string()),
                fragment: None,
            },
        },
        None => match suffix.split_once('#') {
            Some((path, fragment)) => UrlPieces {
                path: path.to_string(),
                query: None,
                fragment: Some(fragment.to_string()),
            },
            None => UrlPieces {
                path: suffix.to_string(),
                query: None,
                fragment: None,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_only() {
        let p = split_suffix("/a/b");
        assert_eq!(p.path, "/a/b");
        assert_eq!(p.query, None);
        assert_eq!(p.fragment, None);
    }

    #[test]
    fn path_query_fragment() {
        let p = split_suffix("a/b?x=1&y=2#sec");
        assert_eq!(p.path, "a/b");
        assert_eq!(p.query.as_deref(), Some("x=1&y=2"));
        assert_eq!(p.fragment.as_deref(), Some("sec"));
    }

    #[test]
    fn fragment_without_query() {
        let p = split_suffix("a/b#sec");
        assert_eq!(p.path, "a/b");
        assert_eq!(p.query, None);
        assert_eq!(p.fragment.as_deref(), Some("sec"));
    }

    #[test]
    fn hash_before_question_mark_binds_to_path() {
        // the first ? wins; a # before it stays in the path
        let p = split_suffix("a#b?c");
        assert_eq!(p.path, "a#b");
        assert_eq!(p.query.as_deref(), Some("c"));
        assert_eq!(p.fragment, None);
    }

    #[test]
    fn empty() {
        let p = split_suffix("");
        assert_eq!(p.path, "");
        assert_eq!(p.query, None);
        assert_eq!(p.fragment, None);
    }
}
