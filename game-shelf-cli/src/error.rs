use thiserror::Error;

use game_shelf_archive::ArchiveError;
use game_shelf_db::{SchemaError, StoreError};
use game_shelf_lib::LibError;
use game_shelf_scraper::ScrapeError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Archive browsing or download failure
    #[error("{0}")]
    Archive(#[from] ArchiveError),

    /// Library store or scanner failure
    #[error("{0}")]
    Lib(#[from] LibError),

    /// Metadata catalog failure
    #[error("{0}")]
    Scrape(#[from] ScrapeError),

    /// Metadata cache could not be opened
    #[error("Database error: {0}")]
    Schema(#[from] SchemaError),

    /// Metadata cache read or write failed
    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    /// Bad or missing command-line input
    #[error("{0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// A background job could not run
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl CliError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
