//! Browsing and downloading from the ROM archive's directory listings.

pub mod browser;
pub mod clipboard;
pub mod download;
pub mod error;
pub mod filters;
pub mod history;
pub mod http;
pub mod index;
pub mod lines;
pub mod queue;

#[cfg(test)]
#[path = "tests/fake_http.rs"]
pub(crate) mod fake_http;

pub use browser::{Browser, BrowserOptions, Session};
pub use clipboard::{Clipboard, SystemClipboard};
pub use download::{
    Delays, DownloadEvent, DownloadOutcome, DownloadStats, Downloader, DrainSummary, download_platform,
    drain_queue, filename_from_url, platform_files,
};
pub use error::ArchiveError;
pub use filters::ExcludeFilters;
pub use history::{BrowseHistory, DEFAULT_HISTORY_LIMIT};
pub use http::{HttpFetch, RemoteFile, ReqwestFetcher};
pub use index::{DirectoryEntry, IndexListing, fetch_index, parse_index};
pub use queue::DownloadQueue;
