//! Filesystem path value type.
//!
//! `FilePath` holds a canonical `/`-separated path string. Construction
//! normalizes separators, strips trailing slashes, expands `~` against the
//! home directory, and expands the `.../` ancestor shorthand (`...` is the
//! grandparent, `....` the great-grandparent, and so on).

mod io;
mod name;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::path::{
    expand_ancestor_dots, has_drive_prefix, join_path, normalize_separators, PathError,
};

/// A filesystem path, always `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePath {
    filename: String,
}

impl FilePath {
    pub fn new(filename: &str) -> FilePath {
        if filename.is_empty() || filename == "." || filename == "/" {
            return FilePath {
                filename: if filename.is_empty() {
                    ".".to_string()
                } else {
                    filename.to_string()
                },
            };
        }

        // the Windows "/C:/..." form drops its leading slash
        if std::path::MAIN_SEPARATOR == '\\' && is_rooted_drive(filename) {
            return FilePath {
                filename: normalize_separators(&filename[1..]),
            };
        }

        let filename = match filename.strip_prefix('~') {
            Some(rest) => match home_dir() {
                Some(home) => {
                    let home = normalize_separators(&home);
                    let rest = normalize_separators(rest);
                    format!(
                        "{}/{}",
                        home.trim_end_matches('/'),
                        rest.trim_start_matches('/')
                    )
                }
                None => normalize_separators(filename),
            },
            None => normalize_separators(filename),
        };
        let filename = filename.trim_end_matches('/');

        FilePath {
            filename: expand_ancestor_dots(filename),
        }
    }

    /// Joins path steps into one `FilePath` through the normalizer.
    pub fn from_segments<I, S>(segments: I) -> Result<FilePath, PathError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(FilePath::new(&join_path(segments)?))
    }

    /// Appends a path step, resolving `.` and `..`.
    pub fn join(&self, other: &str) -> Result<FilePath, PathError> {
        Ok(FilePath::new(&join_path([
            self.filename.as_str(),
            other,
        ])?))
    }

    /// The path as stored, possibly relative.
    pub fn rel_path(&self) -> &str {
        &self.filename
    }

    /// True when the path starts at a root (`/` or a `X:/` drive).
    pub fn is_absolute(&self) -> bool {
        self.filename.starts_with('/') || has_drive_prefix(&self.filename)
    }

    /// The absolute form of this path, resolved against the current
    /// directory when relative.
    pub fn abs_path(&self) -> anyhow::Result<String> {
        use anyhow::Context;

        if self.is_absolute() {
            return Ok(self.filename.clone());
        }
        let cwd = std::env::current_dir().context("resolving current directory")?;
        let cwd = normalize_separators(&cwd.to_string_lossy());
        Ok(join_path([cwd.as_str(), self.filename.as_str()])?)
    }

    /// The containing directory.
    ///
    /// The parent of `.` is `..`, and the parent of a path already ending in
    /// `..` is one level further up.
    pub fn parent(&self) -> FilePath {
        if self.filename == "." {
            FilePath::new("..")
        } else if self.filename.ends_with("..") {
            FilePath {
                filename: format!("{}/..", self.filename),
            }
        } else {
            match self.filename.rsplit_once('/') {
                Some(("", _)) => FilePath::new("/"),
                Some((dir, _)) => FilePath::new(dir),
                None => FilePath::new("."),
            }
        }
    }
}

/// Matches `/X:/` or `/X:\` at the start of a path.
fn is_rooted_drive(filename: &str) -> bool {
    let bytes = filename.as_bytes();
    bytes.len() >= 4
        && bytes[0] == b'/'
        && bytes[1].is_ascii_alphabetic()
        && bytes[2] == b':'
        && (bytes[3] == b'/' || bytes[3] == b'\\')
}

fn home_dir() -> Option<String> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
        .filter(|h| !h.is_empty())
}

/// `path / "step"` is [`FilePath::join`].
impl std::ops::Div<&str> for &FilePath {
    type Output = Result<FilePath, PathError>;

    fn div(self, other: &str) -> Self::Output {
        self.join(other)
    }
}

impl std::ops::Div<&str> for FilePath {
    type Output = Result<FilePath, PathError>;

    fn div(self, other: &str) -> Self::Output {
        self.join(other)
    }
}

impl AsRef<str> for FilePath {
    fn as_ref(&self) -> &str {
        &self.filename
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename)
    }
}

impl FromStr for FilePath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FilePath::new(s))
    }
}

impl Serialize for FilePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.filename)
    }
}

impl<'de> Deserialize<'de> for FilePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FilePath::new(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_normalizes() {
        assert_eq!(FilePath::new("a/b/").rel_path(), "a/b");
        assert_eq!(FilePath::new("a/b///").rel_path(), "a/b");
        assert_eq!(FilePath::new("").rel_path(), ".");
        assert_eq!(FilePath::new("/").rel_path(), "/");
        assert_eq!(FilePath::new(".").rel_path(), ".");
    }

    #[test]
    fn ancestor_dots_expand_at_construction() {
        assert_eq!(FilePath::new("a/.../b").rel_path(), "a/../../b");
        assert_eq!(FilePath::new("a/..../b").rel_path(), "a/../../../b");
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = home_dir() {
            let home = home.trim_end_matches('/').to_string();
            assert_eq!(
                FilePath::new("~/notes.txt").rel_path(),
                format!("{home}/notes.txt")
            );
            assert_eq!(FilePath::new("~").rel_path(), home);
        }
    }

    #[test]
    fn join_through_normalizer() {
        let f = FilePath::new("/a/b");
        assert_eq!(f.join("../c").unwrap().rel_path(), "/a/c");
        assert!(FilePath::new("/").join("..").is_err());
    }

    #[test]
    fn div_operator_joins() {
        let f = FilePath::new("/a/b");
        assert_eq!((&f / "c").unwrap().rel_path(), "/a/b/c");
        assert_eq!((f / "../c").unwrap().rel_path(), "/a/c");
        assert!((FilePath::new("/") / "..").is_err());
    }

    #[test]
    fn from_segments() {
        let f = FilePath::from_segments(["/data", "logs", "../cache"]).unwrap();
        assert_eq!(f.rel_path(), "/data/cache");
    }

    #[test]
    fn parent_rules() {
        assert_eq!(FilePath::new("a/b/c").parent().rel_path(), "a/b");
        assert_eq!(FilePath::new("a").parent().rel_path(), ".");
        assert_eq!(FilePath::new(".").parent().rel_path(), "..");
        assert_eq!(FilePath::new("..").parent().rel_path(), "../..");
        assert_eq!(FilePath::new("/a").parent().rel_path(), "/");
    }

    #[test]
    fn absolute_detection() {
        assert!(FilePath::new("/etc").is_absolute());
        assert!(FilePath::new("C:/data").is_absolute());
        assert!(!FilePath::new("etc").is_absolute());
    }

    #[test]
    fn serializes_as_string() {
        let f = FilePath::new("a/b.txt");
        assert_eq!(serde_json::to_string(&f).unwrap(), "\"a/b.txt\"");
        let back: FilePath = serde_json::from_str("\"a/b.txt\"").unwrap();
        assert_eq!(back, f);
    }
}
