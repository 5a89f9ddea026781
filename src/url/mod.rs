//! URL value type with JSON-aware query parameters.
//!
//! Like a standard URL parser, but the query decodes to a structured value:
//! repeated keys become lists, comma-separated values become lists, and
//! values that look like JSON parse as JSON.

mod decode;
mod encode;
mod error;
mod split;

pub use decode::query_to_value;
pub use encode::value_to_query;
pub use error::UrlError;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use split::split_suffix;

/// A parsed URL. The query is a structured parameter mapping, not a string.
#[derive(Debug, Clone, Default)]
pub struct Url {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
    pub query: Map<String, Value>,
    pub fragment: Option<Value>,
}

impl Url {
    /// Parses a URL string.
    ///
    /// `file://` and scheme-relative (`//`) forms go through a hand-rolled
    /// path/query/fragment splitter, since the standard parser mishandles
    /// them; so do scheme-less inputs, which parse as bare paths. Everything
    /// else delegates scheme/host/port extraction to the `url` crate.
    pub fn parse(value: &str) -> Result<Url, UrlError> {
        if value.is_empty() {
            return Ok(Url::default());
        }

        if let Some((scheme, suffix)) = scheme_relative(value) {
            return Ok(Url::from_pieces(scheme, suffix));
        }
        if !value.contains("://") {
            return Ok(Url::from_pieces(None, value));
        }

        let parsed = url::Url::parse(value).map_err(|source| UrlError::Parse {
            input: value.to_string(),
            source,
        })?;
        Ok(Url {
            scheme: Some(parsed.scheme().to_string()),
            host: parsed.host_str().map(str::to_string),
            port: parsed.port(),
            path: parsed.path().to_string(),
            query: parsed.query().map(query_to_value).unwrap_or_default(),
            fragment: fragment_value(parsed.fragment()),
        })
    }

    fn from_pieces(scheme: Option<String>, suffix: &str) -> Url {
        let pieces = split_suffix(suffix);
        Url {
            scheme,
            host: None,
            port: None,
            path: pieces.path,
            query: pieces
                .query
                .map(|q| query_to_value(&q))
                .unwrap_or_default(),
            fragment: fragment_value(pieces.fragment.as_deref()),
        }
    }

    /// True when no component is set.
    pub fn is_empty(&self) -> bool {
        self.scheme.is_none()
            && self.host.is_none()
            && self.port.is_none()
            && self.path.is_empty()
            && self.query.is_empty()
            && self.fragment.is_none()
    }

    /// Appends a path step, resolving `.` and `..` against the joined path.
    ///
    /// Walking above the path start is clamped, not rejected; the leading
    /// empty segment of an absolute path is never popped. A relative
    /// `file://` URL with no path keeps the step relative.
    pub fn join(&self, other: &str) -> Url {
        let path = if self.scheme.as_deref() == Some("file") && self.path.is_empty() {
            other.trim_start_matches('/').to_string()
        } else {
            format!(
                "{}/{}",
                self.path.trim_end_matches('/'),
                other.trim_start_matches('/')
            )
        };

        let mut parts: Vec<&str> = Vec::new();
        for step in path.split('/') {
            if step == "." {
                // ignored
            } else if step == ".."
                && !parts.is_empty()
                && (parts.len() > 1 || !parts[0].is_empty())
            {
                parts.pop();
            } else {
                parts.push(step);
            }
        }

        let mut out = self.clone();
        out.path = parts.join("/");
        out
    }

    pub fn with_scheme(&self, scheme: &str) -> Url {
        Url {
            scheme: Some(scheme.to_string()),
            ..self.clone()
        }
    }

    pub fn with_host(&self, host: &str) -> Url {
        Url {
            host: Some(host.to_string()),
            ..self.clone()
        }
    }

    pub fn with_port(&self, port: u16) -> Url {
        Url {
            port: Some(port),
            ..self.clone()
        }
    }

    pub fn with_path(&self, path: &str) -> Url {
        Url {
            path: path.to_string(),
            ..self.clone()
        }
    }

    /// Replaces the query. The value must be a mapping.
    pub fn with_query(&self, query: Value) -> Result<Url, UrlError> {
        match query {
            Value::Object(map) => Ok(Url {
                query: map,
                ..self.clone()
            }),
            _ => Err(UrlError::NotAMapping { what: "query" }),
        }
    }

    /// Replaces the fragment. The value must be a mapping.
    pub fn with_fragment(&self, fragment: Value) -> Result<Url, UrlError> {
        match fragment {
            Value::Object(_) => Ok(Url {
                fragment: Some(fragment),
                ..self.clone()
            }),
            _ => Err(UrlError::NotAMapping { what: "fragment" }),
        }
    }

    /// Shallow-merges additional parameters into the query. The value must be
    /// a mapping; existing keys are overwritten.
    pub fn merge_query(&self, params: Value) -> Result<Url, UrlError> {
        let Value::Object(extra) = params else {
            return Err(UrlError::NotAMapping {
                what: "query parameters",
            });
        };
        let mut out = self.clone();
        for (k, v) in extra {
            out.query.insert(k, v);
        }
        Ok(out)
    }
}

/// `file://` and `//` forms, which the standard parser does not handle the
/// way we need.
fn scheme_relative(value: &str) -> Option<(Option<String>, &str)> {
    if let Some(suffix) = value.strip_prefix("file://") {
        return Some((Some("file".to_string()), suffix));
    }
    if let Some(suffix) = value.strip_prefix("//") {
        return Some((None, suffix));
    }
    None
}

fn fragment_value(fragment: Option<&str>) -> Option<Value> {
    fragment
        .filter(|f| !f.is_empty())
        .map(|f| Value::String(f.to_string()))
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}://")?;
        }
        if let Some(host) = &self.host {
            f.write_str(host)?;
        }
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        if !self.path.is_empty() {
            if self.host.is_some() && !self.path.starts_with('/') {
                f.write_str("/")?;
            }
            f.write_str(&self.path)?;
        }
        if !self.query.is_empty() {
            write!(f, "?{}", encode::encode_object(&self.query))?;
        }
        if let Some(fragment) = &self.fragment {
            if let Some(encoded) = value_to_query(fragment) {
                if !encoded.is_empty() {
                    write!(f, "#{encoded}")?;
                }
            }
        }
        Ok(())
    }
}

/// `url / "step"` is [`Url::join`].
impl std::ops::Div<&str> for &Url {
    type Output = Url;

    fn div(self, other: &str) -> Url {
        self.join(other)
    }
}

impl std::ops::Div<&str> for Url {
    type Output = Url;

    fn div(self, other: &str) -> Url {
        self.join(other)
    }
}

impl FromStr for Url {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Url::parse(s)
    }
}

/// Equality and hashing follow the string form.
impl PartialEq for Url {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Url {}

impl Hash for Url {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Serialize for Url {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Url {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Url::parse(&s).map_err(D::Error::custom)
    }
}
