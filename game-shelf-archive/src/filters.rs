//! Exclude filters kept in `rom-filter.txt`.
//!
//! One substring per line, matched case-insensitively against display
//! names. Blank lines and `#` comments are ignored and preserved when the
//! file is edited.

use std::path::Path;

use crate::error::ArchiveError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeFilters {
    patterns: Vec<String>,
}

impl ExcludeFilters {
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filters = Self::default();
        for pattern in patterns {
            if let Some(p) = normalize(pattern.as_ref())
                && !filters.patterns.contains(&p)
            {
                filters.patterns.push(p);
            }
        }
        filters
    }

    /// Load filters from `path`. A missing file means no filters.
    pub fn load(path: &Path) -> Result<Self, ArchiveError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Self::from_patterns(contents.lines())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when any filter is a substring of `name`.
    pub fn excludes(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.patterns.iter().any(|p| lower.contains(p.as_str()))
    }

    /// Append a filter to the file and to this set. Returns false if it was
    /// already present (or blank).
    pub fn add(&mut self, path: &Path, pattern: &str) -> Result<bool, ArchiveError> {
        let Some(pattern) = normalize(pattern) else {
            return Ok(false);
        };
        if self.patterns.contains(&pattern) {
            return Ok(false);
        }

        let mut contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        if !contents.is_empty() && !contents.ends_with('\n') {
            contents.push('\n');
        }
        contents.push_str(&pattern);
        contents.push('\n');
        write_file(path, &contents)?;

        self.patterns.push(pattern);
        Ok(true)
    }

    /// Remove a filter from the file and from this set. Comments and other
    /// lines are kept. Returns false if the filter was not present.
    pub fn remove(&mut self, path: &Path, pattern: &str) -> Result<bool, ArchiveError> {
        let Some(pattern) = normalize(pattern) else {
            return Ok(false);
        };
        if !self.patterns.contains(&pattern) {
            return Ok(false);
        }

        let contents = std::fs::read_to_string(path).unwrap_or_default();
        let kept: Vec<&str> = contents
            .lines()
            .filter(|line| normalize(line).as_deref() != Some(pattern.as_str()))
            .collect();
        let mut rewritten = kept.join("\n");
        if !rewritten.is_empty() {
            rewritten.push('\n');
        }
        write_file(path, &rewritten)?;

        self.patterns.retain(|p| *p != pattern);
        Ok(true)
    }
}

/// Lowercased, trimmed filter text; `None` for blanks and comments.
fn normalize(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        None
    } else {
        Some(line.to_lowercase())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ArchiveError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
