use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::error::ScrapeError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(100);
const USER_AGENT: &str = concat!("game-shelf/", env!("CARGO_PKG_VERSION"));

/// A source of JSON documents. Implemented by [`CatalogClient`] for real
/// requests and by in-memory fakes in tests.
pub trait JsonFetch {
    /// GET `url` with the given query parameters and parse the body as JSON.
    fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = Result<Value, ScrapeError>> + Send;
}

/// HTTP client shared by every catalog, with a minimum interval between
/// requests.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    last_request: Arc<Mutex<Instant>>,
    min_interval: Duration,
}

impl CatalogClient {
    pub fn new() -> Result<Self, ScrapeError> {
        Self::with_interval(MIN_REQUEST_INTERVAL)
    }

    pub fn with_interval(min_interval: Duration) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            last_request: Arc::new(Mutex::new(Instant::now() - min_interval)),
            min_interval,
        })
    }

    /// Wait until at least `min_interval` has passed since the previous
    /// request.
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

impl JsonFetch for CatalogClient {
    fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = Result<Value, ScrapeError>> + Send {
        async move {
            self.rate_limit().await;
            log::debug!("GET {url}");

            let resp = self
                .http
                .get(url)
                .query(query)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?;

            let status = resp.status();
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return Err(ScrapeError::InvalidCredentials(format!(
                    "{url} rejected the request"
                )));
            }
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(ScrapeError::RateLimit(url.to_string()));
            }
            if !status.is_success() {
                return Err(ScrapeError::ServerError {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            let text = resp.text().await?;
            serde_json::from_str(&text).map_err(|e| {
                ScrapeError::Api(format!(
                    "Failed to parse response from {url}: {e}. Response: {}",
                    truncate(&text, 200)
                ))
            })
        }
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("abc", 10), "abc");
        assert_eq!(truncate("jeu non trouvé", 14), "jeu non trouvé");
        assert_eq!(truncate("éééé", 2), "éé");
    }
}
