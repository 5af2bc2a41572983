//! Writes to the `games` metadata cache.

use game_shelf_core::GameMetadata;
use rusqlite::{Connection, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No cached metadata for '{name}'")]
    NotFound { name: String },
}

/// Insert or replace the cached record for a local game name.
///
/// `name` is the key the library looks games up by; the catalog's own title
/// is kept separately in `metadata.name`. Lookups ignore ASCII case.
pub fn upsert_game(
    conn: &Connection,
    name: &str,
    metadata: &GameMetadata,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO games (name, title, source, source_id, cover_url, rating, rating_count,
                            summary, genres, platforms, developers, publishers, release_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         ON CONFLICT(name) DO UPDATE SET
             title = excluded.title,
             source = excluded.source,
             source_id = excluded.source_id,
             cover_url = excluded.cover_url,
             rating = excluded.rating,
             rating_count = excluded.rating_count,
             summary = excluded.summary,
             genres = excluded.genres,
             platforms = excluded.platforms,
             developers = excluded.developers,
             publishers = excluded.publishers,
             release_date = excluded.release_date,
             last_updated = datetime('now')",
        params![
            name,
            metadata.name,
            metadata.source.map(|s| s.as_str()),
            metadata.source_id,
            metadata.cover_url,
            metadata.rating,
            metadata.rating_count,
            metadata.summary,
            serde_json::to_string(&metadata.genres)?,
            serde_json::to_string(&metadata.platforms)?,
            serde_json::to_string(&metadata.developers)?,
            serde_json::to_string(&metadata.publishers)?,
            metadata.release_date,
        ],
    )?;
    log::debug!("Cached metadata for '{name}'");
    Ok(())
}

/// Remove one cached record.
pub fn delete_game(conn: &Connection, name: &str) -> Result<(), StoreError> {
    let removed = conn.execute("DELETE FROM games WHERE name = ?1", params![name])?;
    if removed == 0 {
        return Err(StoreError::NotFound {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Drop every cached record. Returns how many were removed.
pub fn clear_games(conn: &Connection) -> Result<usize, StoreError> {
    Ok(conn.execute("DELETE FROM games", [])?)
}
