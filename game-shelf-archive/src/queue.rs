//! The persisted download queue: one file URL per line.

use std::path::{Path, PathBuf};

use crate::error::ArchiveError;
use crate::lines::{check_entry, read_lines, write_lines};

#[derive(Debug)]
pub struct DownloadQueue {
    path: PathBuf,
    items: Vec<String>,
}

impl DownloadQueue {
    /// Open the queue at `path`. Blank lines are ignored; a missing file is
    /// an empty queue.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let path = path.into();
        let items = read_lines(&path)?;
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.items.iter().any(|i| i == url)
    }

    /// Append a URL and save. Returns false if it was already queued.
    pub fn add(&mut self, url: &str) -> Result<bool, ArchiveError> {
        let url = check_entry(url)?;
        if url.is_empty() || self.contains(url) {
            return Ok(false);
        }
        self.items.push(url.to_string());
        self.save()?;
        Ok(true)
    }

    /// Empty the queue and save the empty file.
    pub fn clear(&mut self) -> Result<(), ArchiveError> {
        self.items.clear();
        self.save()
    }

    pub fn save(&self) -> Result<(), ArchiveError> {
        write_lines(&self.path, &self.items)
    }

    /// Re-read the file, picking up changes made by a batch download.
    pub fn reload(&mut self) -> Result<(), ArchiveError> {
        self.items = read_lines(&self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("download_queue.txt");
        let urls: Vec<String> = (0..25)
            .rev()
            .map(|i| format!("https://host/files/Game%20{i}.zip"))
            .collect();

        let mut queue = DownloadQueue::open(&path).unwrap();
        for url in &urls {
            assert!(queue.add(url).unwrap());
        }

        let reloaded = DownloadQueue::open(&path).unwrap();
        assert_eq!(reloaded.items(), urls.as_slice());
    }

    #[test]
    fn test_add_dedupes_and_blank_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("download_queue.txt");
        std::fs::write(&path, "\nhttps://host/a.zip\n   \nhttps://host/b.zip\n").unwrap();

        let mut queue = DownloadQueue::open(&path).unwrap();
        assert_eq!(queue.len(), 2);
        assert!(!queue.add("https://host/a.zip").unwrap());
        assert!(queue.add("https://host/c.zip").unwrap());
        assert!(queue.add("bad\nurl").is_err());

        queue.clear().unwrap();
        assert!(DownloadQueue::open(&path).unwrap().is_empty());
    }
}
