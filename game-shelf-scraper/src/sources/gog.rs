use game_shelf_core::metadata::normalize_cover_url;
use game_shelf_core::{GameMetadata, MetadataSource};
use serde_json::Value;

use super::{id_field, name_list, number, str_field};
use crate::client::JsonFetch;
use crate::error::ScrapeError;

pub const SEARCH_URL: &str = "https://www.gog.com/games/ajax/filtered";
const HOST: &str = "https://www.gog.com";

/// GOG ratings are on a 0-50 scale.
const RATING_SCALE: f64 = 5.0;

pub async fn search<F: JsonFetch>(
    http: &F,
    query: &str,
) -> Result<Option<GameMetadata>, ScrapeError> {
    let params = [
        ("search", query.to_string()),
        ("limit", "5".to_string()),
        ("page", "1".to_string()),
        ("sort", "relevance".to_string()),
    ];
    let results = http.get_json(SEARCH_URL, &params).await?;
    Ok(parse_search(&results))
}

/// Metadata for the first product of a `filtered` search response.
pub fn parse_search(results: &Value) -> Option<GameMetadata> {
    let product = results.get("products")?.as_array()?.first()?;
    let title = str_field(product, "title")?;

    let mut meta = GameMetadata::new(title, MetadataSource::Gog);
    meta.source_id = id_field(product, "id");
    meta.summary = str_field(product, "description").unwrap_or_default();
    // Product images come without an extension.
    meta.cover_url = str_field(product, "image").and_then(|url| {
        let has_ext = url.rsplit('/').next().is_some_and(|s| s.contains('.'));
        let url = if has_ext { url } else { format!("{url}.jpg") };
        normalize_cover_url(&url, HOST)
    });
    meta.rating = product
        .get("rating")
        .and_then(number)
        .filter(|r| *r > 0.0)
        .map(|r| (r / RATING_SCALE).clamp(0.0, 10.0));
    meta.genres = name_list(product.get("genres"), "name");
    meta.developers = name_list(product.get("developers").or(product.get("developer")), "name");
    meta.publishers = name_list(product.get("publishers").or(product.get("publisher")), "name");
    meta.release_date = str_field(product, "releaseDate");
    meta.platforms = vec!["PC".to_string()];
    Some(meta)
}
