use game_shelf_core::metadata::normalize_cover_url;
use game_shelf_core::{GameMetadata, MetadataSource};
use serde_json::Value;

use super::{id_field, number, str_field};
use crate::client::JsonFetch;
use crate::credentials::ScreenScraperCredentials;
use crate::error::ScrapeError;

pub const SEARCH_URL: &str = "https://www.screenscraper.fr/api2/jeuRecherche.php";
pub const HOST: &str = "https://www.screenscraper.fr";

/// Regions tried, in order, for names, dates and media.
const REGION_PREFERENCE: &[&str] = &["us", "wor", "ss", "eu"];
/// Media types tried, in order, for the cover.
const COVER_MEDIA_TYPES: &[&str] = &["box-2D", "ss"];

pub async fn search<F: JsonFetch>(
    http: &F,
    creds: &ScreenScraperCredentials,
    query: &str,
) -> Result<Option<GameMetadata>, ScrapeError> {
    let params = [
        ("devid", creds.dev_id.clone()),
        ("devpassword", creds.dev_password.clone()),
        ("softname", creds.soft_name.clone()),
        ("output", "json".to_string()),
        ("recherche", query.to_string()),
    ];
    let results = http.get_json(SEARCH_URL, &params).await?;
    Ok(parse_search(&results))
}

/// Metadata for the first game of a `jeuRecherche` response. An empty
/// placeholder game (no id) counts as no match.
pub fn parse_search(results: &Value) -> Option<GameMetadata> {
    let game = results
        .get("response")?
        .get("jeux")?
        .as_array()?
        .iter()
        .find(|g| id_field(g, "id").is_some())?;
    parse_game(game)
}

pub fn parse_game(game: &Value) -> Option<GameMetadata> {
    let name = regional_text(game.get("noms"), "region")
        .or_else(|| str_field(game, "nom"))?;

    let mut meta = GameMetadata::new(name, MetadataSource::ScreenScraper);
    meta.source_id = id_field(game, "id");
    meta.summary = regional_text(game.get("synopsis"), "langue").unwrap_or_default();
    meta.genres = genres(game);
    meta.developers = text_value(game.get("developpeur")).into_iter().collect();
    meta.publishers = text_value(game.get("editeur")).into_iter().collect();
    meta.release_date = match game.get("dates") {
        Some(Value::Object(map)) => REGION_PREFERENCE
            .iter()
            .find_map(|r| map.get(*r).and_then(Value::as_str).map(str::to_string)),
        other => regional_text(other, "region"),
    };
    meta.platforms = text_value(game.get("systeme")).into_iter().collect();
    // Notes are out of 20.
    meta.rating = game
        .get("note")
        .and_then(|n| n.get("text").and_then(number).or_else(|| number(n)))
        .map(|n| (n / 2.0).clamp(0.0, 10.0));
    meta.cover_url = cover(game.get("medias"));
    Some(meta)
}

/// A value that is either a plain string or `{"text": "..."}`.
fn text_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        v @ Value::Object(_) => str_field(v, "text"),
        _ => None,
    }
}

/// Pick from a list of `{"<key>": "us", "text": "..."}` entries, preferring
/// English / US, then world, then the first entry. A plain string is used
/// as is.
fn regional_text(value: Option<&Value>, key: &str) -> Option<String> {
    let entries = match value? {
        Value::Array(entries) => entries,
        other => return text_value(Some(other)),
    };
    let preferred: &[&str] = if key == "langue" {
        &["en"]
    } else {
        REGION_PREFERENCE
    };
    preferred
        .iter()
        .find_map(|want| {
            entries
                .iter()
                .find(|e| e.get(key).and_then(Value::as_str) == Some(*want))
                .and_then(|e| str_field(e, "text"))
        })
        .or_else(|| entries.iter().find_map(|e| str_field(e, "text")))
}

fn genres(game: &Value) -> Vec<String> {
    match game.get("genres") {
        Some(Value::Array(list)) => list
            .iter()
            .filter_map(|g| regional_text(g.get("noms"), "langue"))
            .collect(),
        _ => text_value(game.get("genre")).into_iter().collect(),
    }
}

fn cover(medias: Option<&Value>) -> Option<String> {
    let medias = medias?.as_array()?;
    let url_of = |m: &Value| str_field(m, "url").and_then(|u| normalize_cover_url(&u, HOST));

    for media_type in COVER_MEDIA_TYPES {
        let of_type: Vec<&Value> = medias
            .iter()
            .filter(|m| m.get("type").and_then(Value::as_str) == Some(*media_type))
            .collect();
        let by_region = REGION_PREFERENCE.iter().find_map(|region| {
            of_type
                .iter()
                .find(|m| m.get("region").and_then(Value::as_str) == Some(*region))
                .and_then(|&m| url_of(m))
        });
        if let Some(url) = by_region.or_else(|| of_type.iter().find_map(|&m| url_of(m))) {
            return Some(url);
        }
    }
    None
}
