//! Sequential file downloads with skip-if-exists semantics.
//!
//! A [`Downloader`] owns the counters for one run. Failures are counted
//! and logged, never returned: a batch always runs to the end.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use game_shelf_core::ArchivePlatform;
use game_shelf_core::util::format_size;

use crate::error::ArchiveError;
use crate::filters::ExcludeFilters;
use crate::http::HttpFetch;
use crate::index::{decode_component, fetch_index, platform_url};
use crate::lines::{read_lines, write_lines};

/// Bytes read from the response per write.
pub const CHUNK_SIZE: usize = 8192;

/// Extensions kept by platform batch downloads.
pub const ROM_EXTENSIONS: &[&str] = &[
    ".zip", ".7z", ".rar", ".iso", ".bin", ".cue", ".img", ".mdf", ".mds",
];

/// Counters for one run. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub total_files: usize,
    pub downloaded_files: usize,
    pub failed_files: usize,
    pub skipped_files: usize,
    /// Sum of the lengths advertised by the server.
    pub total_size: u64,
    /// Bytes actually written.
    pub downloaded_size: u64,
}

impl DownloadStats {
    /// Downloaded files as a percentage of all files handled; 0 when none.
    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.downloaded_files as f64 / self.total_files as f64 * 100.0
        }
    }

    /// Human-readable report, one line per figure.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total files: {}", self.total_files),
            format!("Downloaded: {}", self.downloaded_files),
            format!("Failed: {}", self.failed_files),
            format!("Skipped: {}", self.skipped_files),
        ];
        if self.total_size > 0 {
            lines.push(format!(
                "Total size: {} ({} bytes)",
                format_size(self.total_size),
                self.total_size
            ));
            lines.push(format!(
                "Downloaded size: {} ({} bytes)",
                format_size(self.downloaded_size),
                self.downloaded_size
            ));
        }
        lines.push(format!("Success rate: {:.1}%", self.success_rate()));
        lines
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded { bytes: u64 },
    Skipped,
    Failed,
}

/// Progress notifications for a front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    /// A transfer started. Not sent for skipped files.
    Started {
        filename: String,
        content_length: Option<u64>,
    },
    /// Total bytes written so far for the current file.
    Progress { written: u64 },
    Finished {
        filename: String,
        outcome: DownloadOutcome,
    },
}

/// Pause inserted before the next network download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    pub after_success: Duration,
    pub after_failure: Duration,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            after_success: Duration::from_millis(500),
            after_failure: Duration::from_secs(2),
        }
    }
}

impl Delays {
    pub fn none() -> Self {
        Self {
            after_success: Duration::ZERO,
            after_failure: Duration::ZERO,
        }
    }
}

type Observer = Box<dyn FnMut(&DownloadEvent)>;

pub struct Downloader<'a> {
    http: &'a dyn HttpFetch,
    dir: PathBuf,
    delays: Delays,
    pending_delay: Option<Duration>,
    stats: DownloadStats,
    observer: Option<Observer>,
}

impl<'a> Downloader<'a> {
    pub fn new(http: &'a dyn HttpFetch, dir: impl Into<PathBuf>) -> Self {
        Self {
            http,
            dir: dir.into(),
            delays: Delays::default(),
            pending_delay: None,
            stats: DownloadStats::default(),
            observer: None,
        }
    }

    pub fn with_delays(mut self, delays: Delays) -> Self {
        self.delays = delays;
        self
    }

    pub fn with_observer(mut self, observer: impl FnMut(&DownloadEvent) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Change the target directory. Counters are kept.
    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dir = dir.into();
    }

    pub fn stats(&self) -> &DownloadStats {
        &self.stats
    }

    fn notify(&mut self, event: DownloadEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
    }

    /// Download `url` to `<dir>/<filename>`.
    ///
    /// An existing file of that name is counted as skipped without touching
    /// the network; its contents are not checked.
    pub fn download(&mut self, url: &str, filename: &str) -> DownloadOutcome {
        self.stats.total_files += 1;

        if !is_plain_filename(filename) {
            let err = ArchiveError::InvalidFilename(filename.to_string());
            log::warn!("Refusing to download {url}: {err}");
            self.stats.failed_files += 1;
            return self.finish(filename, DownloadOutcome::Failed);
        }

        let target = self.dir.join(filename);
        if target.exists() {
            log::info!("Skipping existing file: {filename}");
            self.stats.skipped_files += 1;
            return self.finish(filename, DownloadOutcome::Skipped);
        }

        if let Some(delay) = self.pending_delay.take()
            && !delay.is_zero()
        {
            std::thread::sleep(delay);
        }

        let outcome = match self.transfer(url, filename, &target) {
            Ok(bytes) => {
                log::info!("Downloaded: {filename}");
                self.stats.downloaded_files += 1;
                self.stats.downloaded_size += bytes;
                self.pending_delay = Some(self.delays.after_success);
                DownloadOutcome::Downloaded { bytes }
            }
            Err(e) => {
                log::warn!("Failed to download {filename}: {e}");
                if target.exists()
                    && let Err(rm) = std::fs::remove_file(&target)
                {
                    log::warn!("Could not remove partial file {}: {}", target.display(), rm);
                }
                self.stats.failed_files += 1;
                self.pending_delay = Some(self.delays.after_failure);
                DownloadOutcome::Failed
            }
        };
        self.finish(filename, outcome)
    }

    fn finish(&mut self, filename: &str, outcome: DownloadOutcome) -> DownloadOutcome {
        self.notify(DownloadEvent::Finished {
            filename: filename.to_string(),
            outcome,
        });
        outcome
    }

    fn transfer(&mut self, url: &str, filename: &str, target: &Path) -> Result<u64, ArchiveError> {
        let remote = self.http.open(url)?;
        if let Some(len) = remote.content_length {
            self.stats.total_size += len;
        }
        self.notify(DownloadEvent::Started {
            filename: filename.to_string(),
            content_length: remote.content_length,
        });

        std::fs::create_dir_all(&self.dir)?;
        let mut file = std::fs::File::create(target)?;
        let mut body = remote.body;
        let mut buf = [0u8; CHUNK_SIZE];
        let mut written: u64 = 0;
        loop {
            let n = match body.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(&buf[..n])?;
            written += n as u64;
            self.notify(DownloadEvent::Progress { written });
        }
        file.flush()?;
        Ok(written)
    }

    /// Download each `(url, filename)` pair in order.
    pub fn download_all(&mut self, items: &[(String, String)]) -> Vec<DownloadOutcome> {
        let total = items.len();
        items
            .iter()
            .enumerate()
            .map(|(i, (url, filename))| {
                log::debug!("File {}/{}: {}", i + 1, total, filename);
                self.download(url, filename)
            })
            .collect()
    }
}

/// True for a single path component that is safe to join onto the
/// download directory.
fn is_plain_filename(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Local file name for a file URL: the last path segment, percent-decoded,
/// without any query or fragment.
pub fn filename_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last = path.rsplit('/').next().unwrap_or(path);
    decode_component(last)
}

/// Result of draining the queue file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainSummary {
    pub attempted: usize,
    /// URLs that failed and were written back to the queue.
    pub requeued: Vec<String>,
}

/// Download every URL in the queue file, in order.
///
/// The file is read once up front and only touched again after the whole
/// batch has run: it is deleted when nothing failed, otherwise rewritten
/// with just the failed URLs. An interrupted run leaves it as it was.
pub fn drain_queue(
    downloader: &mut Downloader<'_>,
    queue_path: &Path,
) -> Result<DrainSummary, ArchiveError> {
    let urls = read_lines(queue_path)?;
    if urls.is_empty() {
        return Ok(DrainSummary::default());
    }

    log::info!("Downloading {} files from queue", urls.len());
    let mut summary = DrainSummary {
        attempted: urls.len(),
        requeued: Vec::new(),
    };
    for (i, url) in urls.iter().enumerate() {
        let filename = filename_from_url(url);
        log::info!("Downloading file {}/{}: {}", i + 1, urls.len(), filename);
        if downloader.download(url, &filename) == DownloadOutcome::Failed {
            summary.requeued.push(url.clone());
        }
    }

    if summary.requeued.is_empty() {
        match std::fs::remove_file(queue_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    } else {
        write_lines(queue_path, &summary.requeued)?;
    }
    Ok(summary)
}

fn has_rom_extension(name: &str) -> bool {
    let lower = name.to_lowercase();
    ROM_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// List the ROM files of one platform as `(url, filename)` pairs, after
/// exclude filters, limited to `max_files` when given.
pub fn platform_files(
    http: &dyn HttpFetch,
    dataset_url: &str,
    platform: &ArchivePlatform,
    filters: &ExcludeFilters,
    max_files: Option<usize>,
) -> Result<Vec<(String, String)>, ArchiveError> {
    let url = platform_url(dataset_url, platform.directory);
    let listing = fetch_index(http, &url, None)?.apply_filters(filters);

    let mut files: Vec<(String, String)> = listing
        .files
        .iter()
        .map(|e| decode_component(&e.raw_href))
        .filter(|name| has_rom_extension(name))
        .map(|name| (format!("{url}{}", urlencoding::encode(&name)), name))
        .collect();

    if let Some(max) = max_files {
        files.truncate(max);
    }
    Ok(files)
}

/// Download one platform's files into `<dir>/<platform directory>/`.
///
/// The downloader's own directory is restored afterwards, so several
/// platforms can share one downloader and one set of counters.
pub fn download_platform(
    downloader: &mut Downloader<'_>,
    platform: &ArchivePlatform,
    files: &[(String, String)],
) -> Vec<DownloadOutcome> {
    let base = downloader.dir().to_path_buf();
    downloader.set_dir(base.join(platform.directory));
    let outcomes = downloader.download_all(files);
    downloader.set_dir(base);
    outcomes
}

#[cfg(test)]
#[path = "tests/download_tests.rs"]
mod tests;
