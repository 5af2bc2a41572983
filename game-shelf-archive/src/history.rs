//! The persisted log of visited listing URLs.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::error::ArchiveError;
use crate::lines::{check_entry, read_lines, write_lines};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Visited URLs, oldest first, capped at `limit` entries.
///
/// A URL already in the log is not appended again. The file is rewritten
/// after every change.
#[derive(Debug)]
pub struct BrowseHistory {
    path: PathBuf,
    limit: usize,
    entries: VecDeque<String>,
}

impl BrowseHistory {
    pub fn open(path: impl Into<PathBuf>, limit: usize) -> Result<Self, ArchiveError> {
        let path = path.into();
        let mut history = Self {
            entries: read_lines(&path)?.into(),
            path,
            limit: limit.max(1),
        };
        history.truncate();
        Ok(history)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Record a visit. Returns false if the URL was already logged.
    pub fn push(&mut self, url: &str) -> Result<bool, ArchiveError> {
        let url = check_entry(url)?;
        if url.is_empty() || self.entries.iter().any(|e| e == url) {
            return Ok(false);
        }
        self.entries.push_back(url.to_string());
        self.truncate();
        self.save()?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), ArchiveError> {
        self.entries.clear();
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn truncate(&mut self) {
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    fn save(&self) -> Result<(), ArchiveError> {
        let entries: Vec<&String> = self.entries.iter().collect();
        write_lines(&self.path, &entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_drops_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("browse_history.txt");
        let mut history = BrowseHistory::open(&path, 100).unwrap();
        for i in 0..150 {
            history.push(&format!("https://host/files/{i}/")).unwrap();
        }
        assert_eq!(history.len(), 100);
        assert_eq!(history.entries().next(), Some("https://host/files/50/"));
        assert_eq!(history.entries().last(), Some("https://host/files/149/"));

        let reopened = BrowseHistory::open(&path, 100).unwrap();
        assert_eq!(
            reopened.entries().collect::<Vec<_>>(),
            history.entries().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_smaller_limit_truncates_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("browse_history.txt");
        std::fs::write(&path, "a\nb\nc\n").unwrap();
        let history = BrowseHistory::open(&path, 2).unwrap();
        assert_eq!(history.entries().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_duplicates_and_line_breaks() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = BrowseHistory::open(dir.path().join("h.txt"), 10).unwrap();
        assert!(history.push("https://host/a/").unwrap());
        assert!(!history.push("https://host/a/").unwrap());
        assert!(matches!(
            history.push("https://host/\nb/"),
            Err(ArchiveError::InvalidEntry(_))
        ));
        assert_eq!(history.len(), 1);

        history.clear().unwrap();
        assert!(history.is_empty());
        assert!(!dir.path().join("h.txt").exists());
    }
}
