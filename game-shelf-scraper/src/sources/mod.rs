//! One module per catalog. Each converts its catalog's JSON into
//! [`GameMetadata`]; the `parse_*` functions are pure so they can be tested
//! against recorded responses.

pub mod gog;
pub mod igdb;
pub mod rawg;
pub mod screenscraper;
pub mod steam;

use game_shelf_core::{GameMetadata, MetadataSource};
use serde_json::Value;

use crate::client::JsonFetch;
use crate::credentials::Credentials;
use crate::error::ScrapeError;
use crate::naming::basic_metadata;

/// Query a single catalog. `Ok(None)` means the catalog answered but had no
/// match, or its credentials are not configured.
pub async fn search_source<F: JsonFetch>(
    http: &F,
    credentials: &Credentials,
    source: MetadataSource,
    query: &str,
) -> Result<Option<GameMetadata>, ScrapeError> {
    match source {
        MetadataSource::Steam => steam::search(http, query).await,
        MetadataSource::Gog => gog::search(http, query).await,
        MetadataSource::Rawg => match credentials.rawg_api_key.as_deref() {
            Some(key) => rawg::search(http, key, query).await,
            None => {
                log::debug!("Skipping RAWG: no API key configured");
                Ok(None)
            }
        },
        MetadataSource::ScreenScraper => match credentials.screenscraper.as_ref() {
            Some(creds) => screenscraper::search(http, creds, query).await,
            None => {
                log::debug!("Skipping ScreenScraper: no developer credentials configured");
                Ok(None)
            }
        },
        MetadataSource::Igdb => igdb::search(http, credentials.igdb.as_ref(), query).await,
        MetadataSource::Basic => Ok(Some(basic_metadata(query))),
    }
}

/// A string field, trimmed; `None` when absent or blank.
pub(crate) fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// An id that may be sent as either a number or a string.
pub(crate) fn id_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// A number that may be sent as either a number or a numeric string.
pub(crate) fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Names from a list of strings or a list of `{"<key>": "..."}` objects.
/// A single string counts as a one-element list.
pub(crate) fn name_list(value: Option<&Value>, key: &str) -> Vec<String> {
    let name_of = |v: &Value| match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Object(_) => str_field(v, key),
        _ => None,
    };
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(name_of)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(v @ Value::String(_)) => name_of(v).filter(|s| !s.is_empty()).into_iter().collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "../tests/sources_tests.rs"]
mod tests;
