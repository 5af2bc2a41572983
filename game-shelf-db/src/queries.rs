//! Read queries for the metadata cache.

use game_shelf_core::{GameMetadata, MetadataSource};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::operations::StoreError;

/// A cached record plus its bookkeeping columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedGame {
    /// Local lookup name.
    pub name: String,
    pub metadata: GameMetadata,
    /// SQLite `datetime('now')` text, UTC (`YYYY-MM-DD HH:MM:SS`).
    pub last_updated: String,
}

const GAME_COLUMNS: &str = "name, title, source, source_id, cover_url, rating, rating_count,
                            summary, genres, platforms, developers, publishers, release_date,
                            last_updated";

/// Look up a game by local name, ignoring ASCII case.
pub fn find_game(conn: &Connection, name: &str) -> Result<Option<CachedGame>, StoreError> {
    let sql = format!("SELECT {GAME_COLUMNS} FROM games WHERE name = ?1");
    let mut stmt = conn.prepare(&sql)?;
    Ok(stmt.query_row(params![name], row_to_game).optional()?)
}

/// All cached games, sorted by name.
pub fn list_games(conn: &Connection) -> Result<Vec<CachedGame>, StoreError> {
    let sql = format!("SELECT {GAME_COLUMNS} FROM games ORDER BY name");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_game)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Search local names and catalog titles (case-insensitive LIKE).
pub fn search_games(conn: &Connection, query: &str) -> Result<Vec<CachedGame>, StoreError> {
    let sql = format!(
        "SELECT {GAME_COLUMNS} FROM games
         WHERE name LIKE ?1 OR title LIKE ?1
         ORDER BY name"
    );
    let pattern = format!("%{query}%");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![pattern], row_to_game)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Number of cached games.
pub fn count_games(conn: &Connection) -> Result<usize, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
    Ok(count as usize)
}

fn row_to_game(row: &Row) -> rusqlite::Result<CachedGame> {
    let source = match row.get::<_, Option<String>>(2)? {
        Some(s) => Some(
            s.parse::<MetadataSource>()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, e.into()))?,
        ),
        None => None,
    };

    Ok(CachedGame {
        name: row.get(0)?,
        metadata: GameMetadata {
            name: row.get(1)?,
            source,
            source_id: row.get(3)?,
            cover_url: row.get(4)?,
            rating: row.get(5)?,
            rating_count: row.get(6)?,
            summary: row.get(7)?,
            genres: json_list(row, 8)?,
            platforms: json_list(row, 9)?,
            developers: json_list(row, 10)?,
            publishers: json_list(row, 11)?,
            release_date: row.get(12)?,
        },
        last_updated: row.get(13)?,
    })
}

fn json_list(row: &Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
