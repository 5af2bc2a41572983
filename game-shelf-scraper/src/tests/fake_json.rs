//! In-memory [`JsonFetch`] for unit tests. Responses are keyed by URL;
//! query parameters are recorded but not matched.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use serde_json::Value;

use crate::client::JsonFetch;
use crate::error::ScrapeError;

#[derive(Default)]
pub struct FakeJson {
    responses: HashMap<String, Value>,
    pub requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl FakeJson {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: Value) -> Self {
        self.responses.insert(url.to_string(), body);
        self
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn query_of(&self, url: &str) -> Option<Vec<(String, String)>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, q)| q.clone())
    }
}

impl JsonFetch for FakeJson {
    fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = Result<Value, ScrapeError>> + Send {
        self.requests.lock().unwrap().push((
            url.to_string(),
            query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ));
        let reply = self
            .responses
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::ServerError {
                url: url.to_string(),
                status: 404,
            });
        std::future::ready(reply)
    }
}
