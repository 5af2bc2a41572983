use game_shelf_core::{GameMetadata, MetadataSource};
use serde_json::Value;

use super::{id_field, name_list, number, str_field};
use crate::client::JsonFetch;
use crate::error::ScrapeError;

pub const GAMES_URL: &str = "https://api.rawg.io/api/games";

pub async fn search<F: JsonFetch>(
    http: &F,
    api_key: &str,
    query: &str,
) -> Result<Option<GameMetadata>, ScrapeError> {
    let params = [
        ("key", api_key.to_string()),
        ("search", query.to_string()),
        ("page_size", "1".to_string()),
    ];
    let results = http.get_json(GAMES_URL, &params).await?;
    let Some(hit) = results
        .get("results")
        .and_then(Value::as_array)
        .and_then(|r| r.first())
    else {
        return Ok(None);
    };
    let Some(id) = id_field(hit, "id") else {
        return Ok(parse_game(hit));
    };

    let url = format!("{GAMES_URL}/{id}");
    match http.get_json(&url, &[("key", api_key.to_string())]).await {
        Ok(details) => Ok(parse_game(&details).or_else(|| parse_game(hit))),
        Err(e) => {
            log::debug!("RAWG details for {id} failed: {e}");
            Ok(parse_game(hit))
        }
    }
}

/// Metadata from a RAWG game object (search hit or details).
/// RAWG rates 0-5; the rating is doubled onto the 0-10 scale.
pub fn parse_game(game: &Value) -> Option<GameMetadata> {
    let name = str_field(game, "name")?;

    let mut meta = GameMetadata::new(name, MetadataSource::Rawg);
    meta.source_id = id_field(game, "id");
    meta.summary = str_field(game, "description_raw").unwrap_or_default();
    meta.cover_url = str_field(game, "background_image");
    meta.rating = game
        .get("rating")
        .and_then(number)
        .filter(|r| *r > 0.0)
        .map(|r| (r * 2.0).clamp(0.0, 10.0));
    meta.rating_count = game
        .get("ratings_count")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok());
    meta.genres = name_list(game.get("genres"), "name");
    meta.platforms = game
        .get("platforms")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|p| p.get("platform").and_then(|p| str_field(p, "name")))
                .collect()
        })
        .unwrap_or_default();
    meta.developers = name_list(game.get("developers"), "name");
    meta.publishers = name_list(game.get("publishers"), "name");
    meta.release_date = str_field(game, "released");
    Some(meta)
}
