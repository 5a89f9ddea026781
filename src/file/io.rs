//! Thin filesystem wrappers over std::fs.
//!
//! Content is assumed to be UTF-8. Writes create missing parent directories,
//! and delete is idempotent.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::FilePath;

impl FilePath {
    pub fn exists(&self) -> bool {
        Path::new(&self.filename).exists()
    }

    pub fn is_directory(&self) -> bool {
        Path::new(&self.filename).is_dir()
    }

    /// File size in bytes.
    pub fn size(&self) -> Result<u64> {
        let meta = fs::metadata(&self.filename)
            .with_context(|| format!("sizing {}", self.filename))?;
        Ok(meta.len())
    }

    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.filename)
            .with_context(|| format!("reading {}", self.filename))
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        fs::read(&self.filename).with_context(|| format!("reading {}", self.filename))
    }

    /// Lines of the file, trailing whitespace stripped.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let content = self.read()?;
        Ok(content.lines().map(|l| l.trim_end().to_string()).collect())
    }

    pub fn write(&self, content: &str) -> Result<()> {
        self.write_bytes(content.as_bytes())
    }

    pub fn write_bytes(&self, content: &[u8]) -> Result<()> {
        self.ensure_parent()?;
        fs::write(&self.filename, content)
            .with_context(|| format!("writing {}", self.filename))
    }

    /// Appends a line (newline added) to the file, creating it if missing.
    pub fn append(&self, line: &str) -> Result<()> {
        self.ensure_parent()?;
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.filename)
            .with_context(|| format!("opening {} for append", self.filename))?;
        f.write_all(line.as_bytes())?;
        f.write_all(b"\n")?;
        Ok(())
    }

    /// Removes the file, or the directory tree. Missing paths are fine.
    pub fn delete(&self) -> Result<()> {
        let path = Path::new(&self.filename);
        if path.is_dir() {
            tracing::debug!("deleting directory tree {}", self.filename);
            fs::remove_dir_all(path)
                .with_context(|| format!("deleting directory {}", self.filename))?;
        } else if path.is_file() {
            fs::remove_file(path).with_context(|| format!("deleting {}", self.filename))?;
        }
        Ok(())
    }

    pub fn create_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.filename)
            .with_context(|| format!("creating directory {}", self.filename))
    }

    /// Direct children of a directory; empty for a missing path.
    pub fn children(&self) -> Result<Vec<FilePath>> {
        let entries = match fs::read_dir(&self.filename) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("listing {}", self.filename));
            }
        };
        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("listing {}", self.filename))?;
            let name = entry.file_name();
            out.push(FilePath::new(&format!(
                "{}/{}",
                self.filename,
                name.to_string_lossy()
            )));
        }
        Ok(out)
    }

    /// Copies this file, or this directory tree, to `to`.
    pub fn copy(&self, to: &FilePath) -> Result<()> {
        if self.is_directory() {
            to.create_dir()?;
            for child in self.children()? {
                child.copy(&to.join(child.name())?)?;
            }
            Ok(())
        } else {
            to.write_bytes(&self.read_bytes()?)
        }
    }

    /// This path and, recursively, everything under it.
    pub fn descendants(&self) -> Result<Vec<FilePath>> {
        let mut out = vec![self.clone()];
        if self.is_directory() {
            for child in self.children()? {
                out.extend(child.descendants()?);
            }
        }
        Ok(out)
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some((dir, _)) = self.filename.rsplit_once('/') {
            if !dir.is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("creating parent directory {dir}"))?;
            }
        }
        Ok(())
    }
}
