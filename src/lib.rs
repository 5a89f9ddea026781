//! File and URL value types.
//!
//! Two thin abstractions over operating-system paths and URLs:
//!
//! - [`FilePath`]: a `/`-separated filesystem path with pure manipulation
//!   (name, extension, parent, join) and thin I/O wrappers.
//! - [`Url`]: a URL whose query decodes to a structured value: repeated
//!   keys and comma-separated values become lists, and values that look like
//!   JSON parse as JSON.
//!
//! Path joining deliberately favors pragmatic behavior (custom `...`
//! ancestor shorthand, tolerant normalization) and the query codec favors
//! common web-application encodings over full RFC 3986 correctness.

pub mod file;
pub mod path;
pub mod url;

pub use crate::file::FilePath;
pub use crate::path::{join_path, PathError};
pub use crate::url::{query_to_value, value_to_query, Url, UrlError};
