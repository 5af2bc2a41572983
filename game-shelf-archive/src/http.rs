//! The HTTP seam between the archive logic and the network.
//!
//! Everything above this module talks to [`HttpFetch`], so listings and
//! downloads can be driven by an in-memory fake in tests.

use std::io::Read;
use std::time::Duration;

use crate::error::ArchiveError;

/// User agent sent with every request. Some mirrors reject obvious bots.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Timeout for fetching an index page.
pub const INDEX_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for a file download. The blocking client applies it to the
/// connect and to each body read, not to the whole transfer, so a large
/// image may stream for as long as data keeps arriving.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// An open response body for a file download.
pub struct RemoteFile {
    /// Length advertised by the server, if any.
    pub content_length: Option<u64>,
    pub body: Box<dyn Read + Send>,
}

impl std::fmt::Debug for RemoteFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteFile")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Blocking GET requests against the archive.
pub trait HttpFetch {
    /// Fetch a page as text. Non-2xx statuses are errors.
    fn get_text(&self, url: &str) -> Result<String, ArchiveError>;

    /// Start a streaming download. Non-2xx statuses are errors.
    fn open(&self, url: &str) -> Result<RemoteFile, ArchiveError>;
}

/// [`HttpFetch`] backed by `reqwest`'s blocking client.
pub struct ReqwestFetcher {
    index_client: reqwest::blocking::Client,
    download_client: reqwest::blocking::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, ArchiveError> {
        Self::with_timeouts(INDEX_TIMEOUT, DOWNLOAD_TIMEOUT)
    }

    pub fn with_timeouts(index: Duration, download: Duration) -> Result<Self, ArchiveError> {
        Ok(Self {
            index_client: build_client(reqwest::blocking::Client::builder().timeout(index))?,
            download_client: build_client(
                reqwest::blocking::Client::builder()
                    .connect_timeout(download)
                    .timeout(download),
            )?,
        })
    }
}

fn build_client(
    builder: reqwest::blocking::ClientBuilder,
) -> Result<reqwest::blocking::Client, ArchiveError> {
    builder
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ArchiveError::http("<client>", e))
}

fn checked(
    url: &str,
    response: reqwest::Result<reqwest::blocking::Response>,
) -> Result<reqwest::blocking::Response, ArchiveError> {
    let response = response.map_err(|e| ArchiveError::http(url, e))?;
    let status = response.status();
    if !status.is_success() {
        return Err(ArchiveError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

impl HttpFetch for ReqwestFetcher {
    fn get_text(&self, url: &str) -> Result<String, ArchiveError> {
        let response = checked(url, self.index_client.get(url).send())?;
        response.text().map_err(|e| ArchiveError::http(url, e))
    }

    fn open(&self, url: &str) -> Result<RemoteFile, ArchiveError> {
        let response = checked(url, self.download_client.get(url).send())?;
        Ok(RemoteFile {
            content_length: response.content_length(),
            body: Box::new(response),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Instant;

    use super::*;

    /// Serve one response that promises 100 bytes, sends 3 and then stalls.
    fn stalling_server(stall: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = [0u8; 1024];
                let _ = stream.read(&mut request);
                let _ = stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nabc");
                let _ = stream.flush();
                std::thread::sleep(stall);
            }
        });
        format!("http://{addr}/stalled.zip")
    }

    #[test]
    fn test_stalled_download_times_out() {
        let url = stalling_server(Duration::from_secs(10));
        let fetcher =
            ReqwestFetcher::with_timeouts(Duration::from_secs(2), Duration::from_millis(300))
                .unwrap();

        let started = Instant::now();
        let mut remote = fetcher.open(&url).unwrap();
        assert_eq!(remote.content_length, Some(100));
        let mut buf = Vec::new();
        assert!(remote.body.read_to_end(&mut buf).is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
