/// Errors that can occur while fetching metadata.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by {0}")]
    RateLimit(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Server error (HTTP {status}) from {url}")]
    ServerError { url: String, status: u16 },

    #[error("API error: {0}")]
    Api(String),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("A metadata fetch is already running")]
    WorkerBusy,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
