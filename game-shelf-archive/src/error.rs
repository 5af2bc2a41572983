/// Errors that can occur while browsing or downloading from the archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid file name '{0}'")]
    InvalidFilename(String),

    #[error("Entry contains a line break: {0:?}")]
    InvalidEntry(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl ArchiveError {
    pub fn http(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Http {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn clipboard(msg: impl Into<String>) -> Self {
        Self::Clipboard(msg.into())
    }
}
