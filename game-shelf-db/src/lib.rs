//! SQLite cache for game metadata fetched from online catalogs.
//!
//! One `games` row per local game name, so repeat lookups skip the network
//! until the caller asks for a refresh.

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{StoreError, clear_games, delete_game, upsert_game};
pub use queries::{CachedGame, count_games, find_game, list_games, search_games};
pub use rusqlite::Connection;
pub use schema::{SchemaError, open_database, open_memory};
