//! Filename accessors: name, stem, extension, suffixes.

use super::FilePath;

impl FilePath {
    /// The final path component.
    pub fn name(&self) -> &str {
        match self.filename.rsplit_once('/') {
            Some((_, name)) => name,
            None => &self.filename,
        }
    }

    /// The extension after the last `.` of the name, or `""` when the name
    /// has no dot.
    pub fn extension(&self) -> &str {
        match self.name().rsplit_once('.') {
            Some((_, ext)) => ext,
            None => "",
        }
    }

    /// The name without its extension.
    pub fn stem(&self) -> &str {
        match self.name().rsplit_once('.') {
            Some((stem, _)) => stem,
            None => self.name(),
        }
    }

    /// Replaces the extension, or appends one when the name has none.
    pub fn set_extension(&self, ext: &str) -> FilePath {
        let name = self.name();
        let new_name = match name.rsplit_once('.') {
            Some((stem, _)) => format!("{stem}.{ext}"),
            None => format!("{name}.{ext}"),
        };
        self.with_name_component(&new_name)
    }

    /// Drops the extension, when there is one.
    pub fn strip_extension(&self) -> FilePath {
        match self.name().rsplit_once('.') {
            Some((stem, _)) => self.with_name_component(stem),
            None => self.clone(),
        }
    }

    /// Appends an extension; the old extension becomes part of the stem.
    pub fn add_extension(&self, ext: &str) -> FilePath {
        FilePath::new(&format!("{}.{}", self.filename, ext))
    }

    /// Replaces the name, keeping the extension.
    pub fn set_name(&self, name: &str) -> FilePath {
        let new_name = match self.name().rsplit_once('.') {
            Some((_, ext)) => format!("{name}.{ext}"),
            None => name.to_string(),
        };
        self.with_name_component(&new_name)
    }

    /// Inserts a suffix before the final extension:
    /// `report.csv` + `backup` → `report.backup.csv`.
    pub fn add_suffix(&self, suffix: &str) -> FilePath {
        let suffix = suffix.trim_matches('.');
        let name = self.name();
        let new_name = match name.rsplit_once('.') {
            Some((stem, ext)) => format!("{stem}.{suffix}.{ext}"),
            None => format!("{name}.{suffix}"),
        };
        self.with_name_component(&new_name)
    }

    fn with_name_component(&self, new_name: &str) -> FilePath {
        match self.filename.rsplit_once('/') {
            Some((dir, _)) => FilePath::new(&format!("{dir}/{new_name}")),
            None => FilePath::new(new_name),
        }
    }
}
