//! In-memory [`HttpFetch`] for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Read;

use crate::error::ArchiveError;
use crate::http::{HttpFetch, RemoteFile};

pub enum FakeResponse {
    Body(Vec<u8>),
    Status(u16),
    /// Sends these bytes, then fails the read.
    Broken(Vec<u8>),
}

#[derive(Default)]
pub struct FakeHttp {
    responses: HashMap<String, FakeResponse>,
    pub requests: RefCell<Vec<String>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, response: FakeResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.with(url, FakeResponse::Body(html.as_bytes().to_vec()))
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn lookup(&self, url: &str) -> Result<&FakeResponse, ArchiveError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.responses.get(url) {
            Some(FakeResponse::Status(code)) => Err(ArchiveError::Status {
                url: url.to_string(),
                status: *code,
            }),
            Some(response) => Ok(response),
            None => Err(ArchiveError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

struct BrokenReader {
    data: std::io::Cursor<Vec<u8>>,
}

impl Read for BrokenReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            )),
            n => Ok(n),
        }
    }
}

impl HttpFetch for FakeHttp {
    fn get_text(&self, url: &str) -> Result<String, ArchiveError> {
        match self.lookup(url)? {
            FakeResponse::Body(body) => Ok(String::from_utf8_lossy(body).into_owned()),
            _ => Err(ArchiveError::http(url, "broken response")),
        }
    }

    fn open(&self, url: &str) -> Result<RemoteFile, ArchiveError> {
        match self.lookup(url)? {
            FakeResponse::Body(body) => Ok(RemoteFile {
                content_length: Some(body.len() as u64),
                body: Box::new(std::io::Cursor::new(body.clone())),
            }),
            FakeResponse::Broken(partial) => Ok(RemoteFile {
                content_length: Some(partial.len() as u64 * 2),
                body: Box::new(BrokenReader {
                    data: std::io::Cursor::new(partial.clone()),
                }),
            }),
            FakeResponse::Status(_) => unreachable!("status responses are errors"),
        }
    }
}
