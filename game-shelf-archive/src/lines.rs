//! Newline-delimited URL files shared by the queue and the history log.

use std::path::Path;

use crate::error::ArchiveError;

/// Read non-blank, trimmed lines. A missing file reads as empty.
pub fn read_lines(path: &Path) -> Result<Vec<String>, ArchiveError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Write one entry per line, replacing the file.
pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<(), ArchiveError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut contents = String::new();
    for line in lines {
        contents.push_str(line.as_ref());
        contents.push('\n');
    }
    std::fs::write(path, contents)?;
    Ok(())
}

/// Reject entries that would split into several lines on disk.
pub fn check_entry(entry: &str) -> Result<&str, ArchiveError> {
    if entry.contains(['\n', '\r']) {
        return Err(ArchiveError::InvalidEntry(entry.to_string()));
    }
    Ok(entry.trim())
}
