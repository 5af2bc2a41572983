use game_shelf_core::{GameMetadata, MetadataSource};
use serde_json::Value;

use super::{id_field, name_list, number, str_field};
use crate::client::JsonFetch;
use crate::error::ScrapeError;
use crate::naming::assign_basic_rating;

pub const SEARCH_URL: &str = "https://store.steampowered.com/api/storesearch/";
pub const DETAILS_URL: &str = "https://store.steampowered.com/api/appdetails";

/// Search the Steam store and fetch details for the first hit. If the
/// details request fails the search hit alone is used.
pub async fn search<F: JsonFetch>(
    http: &F,
    query: &str,
) -> Result<Option<GameMetadata>, ScrapeError> {
    let params = [
        ("term", query.to_string()),
        ("l", "english".to_string()),
        ("cc", "US".to_string()),
    ];
    let results = http.get_json(SEARCH_URL, &params).await?;
    let Some(item) = first_hit(&results) else {
        return Ok(None);
    };
    let Some(app_id) = id_field(item, "id") else {
        return Ok(None);
    };

    let params = [
        ("appids", app_id.clone()),
        ("l", "english".to_string()),
        ("cc", "US".to_string()),
    ];
    match http.get_json(DETAILS_URL, &params).await {
        Ok(details) => {
            if let Some(meta) = parse_details(&app_id, &details) {
                return Ok(Some(meta));
            }
        }
        Err(e) => log::debug!("Steam details for {app_id} failed: {e}"),
    }
    Ok(parse_search_item(item))
}

/// First entry of a `storesearch` response.
pub fn first_hit(results: &Value) -> Option<&Value> {
    results.get("items")?.as_array()?.first()
}

/// Metadata from a search hit alone: name, id and thumbnail.
pub fn parse_search_item(item: &Value) -> Option<GameMetadata> {
    let name = str_field(item, "name")?;
    let mut meta = GameMetadata::new(&name, MetadataSource::Steam);
    meta.source_id = id_field(item, "id");
    meta.cover_url = str_field(item, "tiny_image");
    meta.rating = Some(assign_basic_rating(&name, &[]));
    meta.platforms = vec!["PC".to_string()];
    Some(meta)
}

/// Metadata from an `appdetails` response. `None` unless the response for
/// `app_id` reports success.
///
/// Steam has no user rating in this API: the Metacritic score (0-100) is
/// used when present, otherwise the name/genre heuristic.
pub fn parse_details(app_id: &str, details: &Value) -> Option<GameMetadata> {
    let entry = details.get(app_id)?;
    if !entry.get("success").and_then(Value::as_bool).unwrap_or(false) {
        return None;
    }
    let data = entry.get("data")?;
    let name = str_field(data, "name")?;

    let mut meta = GameMetadata::new(&name, MetadataSource::Steam);
    meta.source_id = Some(app_id.to_string());
    meta.summary = str_field(data, "short_description").unwrap_or_default();
    meta.cover_url = str_field(data, "header_image");
    meta.genres = name_list(data.get("genres"), "description");
    meta.developers = name_list(data.get("developers"), "name");
    meta.publishers = name_list(data.get("publishers"), "name");
    meta.release_date = data.get("release_date").and_then(|d| str_field(d, "date"));
    meta.platforms = vec!["PC".to_string()];
    meta.rating = data
        .get("metacritic")
        .and_then(|m| m.get("score"))
        .and_then(number)
        .map(|score| (score / 10.0).clamp(0.0, 10.0))
        .or_else(|| Some(assign_basic_rating(&name, &meta.genres)));
    Some(meta)
}
