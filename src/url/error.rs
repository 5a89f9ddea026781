//! Error types for URL parsing and mutation.

use thiserror::Error;

/// Failure while parsing or modifying a [`Url`](super::Url).
#[derive(Debug, Error)]
pub enum UrlError {
    /// The input could not be parsed as a URL.
    #[error("problem parsing {input:?} as URL")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },
    /// Query and fragment are structurally mappings; anything else is a
    /// contract violation, not coerced.
    #[error("can only set {what} to a mapping of parameters")]
    NotAMapping { what: &'static str },
}
