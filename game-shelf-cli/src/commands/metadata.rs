//! Metadata commands: fetch through the catalog chain into the SQLite cache.

use chrono::NaiveDateTime;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use game_shelf_core::{GameMetadata, MetadataSource};
use game_shelf_db::{
    CachedGame, Connection, StoreError, clear_games, count_games, delete_game, find_game,
    list_games, open_database, search_games, upsert_game,
};
use game_shelf_scraper::{
    CatalogClient, Credentials, MetadataFetcher, MetadataProgress, MetadataWorker,
};

use super::{AppContext, failure, heading, success, warning};
use crate::spinner::spinner;
use crate::{CliError, log_blank};

fn open_cache(ctx: &AppContext) -> Result<Connection, CliError> {
    Ok(open_database(&ctx.paths.database_file())?)
}

fn source_label(source: Option<MetadataSource>) -> &'static str {
    source.map_or("unknown", |s| s.display_name())
}

/// Fetch every name that is not cached yet (all of them with `refresh`) on
/// the background worker and store each result as it arrives.
pub(crate) fn run_fetch(
    ctx: &AppContext,
    names: Vec<String>,
    refresh: bool,
    sources: Vec<MetadataSource>,
) -> Result<(), CliError> {
    let conn = open_cache(ctx)?;

    let mut pending: Vec<String> = Vec::new();
    for name in names {
        let name = name.trim().to_string();
        if name.is_empty() || pending.contains(&name) {
            continue;
        }
        if !refresh && let Some(cached) = find_game(&conn, &name)? {
            log::info!(
                "{} already cached from {}",
                name.if_supports_color(Stdout, |t| t.bold()),
                source_label(cached.metadata.source)
            );
            continue;
        }
        pending.push(name);
    }
    if pending.is_empty() {
        log::info!("Nothing to fetch; use --refresh to query the catalogs again");
        return Ok(());
    }

    let mut fetcher = MetadataFetcher::new(CatalogClient::new()?, Credentials::load());
    if !sources.is_empty() {
        fetcher = fetcher.with_sources(&sources);
    }
    let order: Vec<&str> = fetcher.sources().iter().map(|s| s.display_name()).collect();
    log::debug!("Catalog order: {}", order.join(" -> "));

    let total = pending.len();
    let mut worker = MetadataWorker::new();
    let events = worker.start(fetcher, pending)?;
    let pb = spinner("Starting metadata fetch...", ctx.quiet);

    let mut failed = None;
    for event in events {
        match event {
            MetadataProgress::Started { total } => {
                pb.set_message(format!("Fetching metadata for {total} games"));
            }
            MetadataProgress::Fetching { index, name } => {
                pb.set_message(format!("[{}/{}] {}", index + 1, total, name));
            }
            MetadataProgress::Found { name, metadata, .. } => {
                pb.suspend(|| {
                    success(format!("{name}: {}", source_label(metadata.source)));
                    store(&conn, &name, &metadata);
                });
            }
            MetadataProgress::NotFound { name, metadata, .. } => {
                pb.suspend(|| {
                    warning(format!(
                        "{name}: no catalog description, stored {} data",
                        source_label(metadata.source)
                    ));
                    store(&conn, &name, &metadata);
                });
            }
            MetadataProgress::Failed { message } => failed = Some(message),
            MetadataProgress::Completed { found, not_found } => {
                pb.finish_and_clear();
                log_blank();
                log::info!(
                    "Metadata fetch complete: {} found, {} without a description",
                    found,
                    not_found
                );
            }
        }
    }
    pb.finish_and_clear();
    worker.join();

    match failed {
        Some(message) => Err(CliError::runtime(message)),
        None => Ok(()),
    }
}

/// Cache one result. A failed write is reported and the batch goes on.
fn store(conn: &Connection, name: &str, metadata: &GameMetadata) {
    if let Err(e) = upsert_game(conn, name, metadata) {
        failure(format!("Could not cache {name}: {e}"));
    }
}

pub(crate) fn run_show(ctx: &AppContext, name: &str) -> Result<(), CliError> {
    let conn = open_cache(ctx)?;
    let Some(cached) = find_game(&conn, name)? else {
        warning(format!("No cached metadata for {name}"));
        log::info!("Run 'game-shelf metadata fetch \"{name}\"' to look it up.");
        return Ok(());
    };
    print_game(ctx, &cached);
    Ok(())
}

fn print_game(ctx: &AppContext, cached: &CachedGame) {
    let meta = &cached.metadata;
    heading(&cached.name);
    if meta.name != cached.name {
        log::info!("  Title:       {}", meta.name);
    }

    let source = match &meta.source_id {
        Some(id) => format!("{} (id {id})", source_label(meta.source)),
        None => source_label(meta.source).to_string(),
    };
    log::info!("  Source:      {source}");

    if let Some(rating) = meta.rating {
        let count = meta
            .rating_count
            .map(|n| format!(" from {n} ratings"))
            .unwrap_or_default();
        log::info!(
            "  Rating:      {}{count}",
            ctx.app_config
                .format_rating(rating)
                .if_supports_color(Stdout, |t| t.yellow())
        );
    }
    if let Some(date) = &meta.release_date {
        log::info!("  Released:    {date}");
    }
    for (label, values) in [
        ("Genres", &meta.genres),
        ("Platforms", &meta.platforms),
        ("Developers", &meta.developers),
        ("Publishers", &meta.publishers),
    ] {
        if !values.is_empty() {
            log::info!("  {:<12} {}", format!("{label}:"), values.join(", "));
        }
    }
    if let Some(url) = &meta.cover_url {
        log::info!(
            "  Cover:       {}",
            url.if_supports_color(Stdout, |t| t.cyan())
        );
    }
    if !meta.summary.is_empty() {
        log_blank();
        log::info!("  {}", meta.summary);
    }

    log_blank();
    let now = chrono::Utc::now().naive_utc();
    let age = describe_age(&cached.last_updated, now)
        .unwrap_or_else(|| cached.last_updated.clone());
    log::info!(
        "{}",
        format!("  Cached {age}").if_supports_color(Stdout, |t| t.dimmed())
    );
}

/// "3 days ago" style age for a SQLite UTC timestamp.
fn describe_age(last_updated: &str, now: NaiveDateTime) -> Option<String> {
    let then = NaiveDateTime::parse_from_str(last_updated, "%Y-%m-%d %H:%M:%S").ok()?;
    let elapsed = now.signed_duration_since(then);
    let plural = |n: i64, unit: &str| format!("{n} {unit}{} ago", if n == 1 { "" } else { "s" });

    Some(if elapsed.num_days() > 0 {
        plural(elapsed.num_days(), "day")
    } else if elapsed.num_hours() > 0 {
        plural(elapsed.num_hours(), "hour")
    } else if elapsed.num_minutes() > 0 {
        plural(elapsed.num_minutes(), "minute")
    } else {
        "just now".to_string()
    })
}

pub(crate) fn run_list(ctx: &AppContext, query: Option<&str>) -> Result<(), CliError> {
    let conn = open_cache(ctx)?;
    let games = match query {
        Some(q) => search_games(&conn, q)?,
        None => list_games(&conn)?,
    };

    if games.is_empty() {
        match query {
            Some(q) => log::info!("No cached games match '{q}'"),
            None => log::info!("The metadata cache is empty"),
        }
        return Ok(());
    }

    heading(&format!(
        "Cached metadata ({} of {} games):",
        games.len(),
        count_games(&conn)?
    ));
    for game in &games {
        let rating = game
            .metadata
            .rating
            .map(|r| ctx.app_config.format_rating(r))
            .unwrap_or_else(|| "-".to_string());
        log::info!(
            "  {:<40} {:>4}  {}",
            game.name,
            rating,
            source_label(game.metadata.source).if_supports_color(Stdout, |t| t.dimmed())
        );
    }
    Ok(())
}

pub(crate) fn run_forget(ctx: &AppContext, name: Option<&str>, all: bool) -> Result<(), CliError> {
    let conn = open_cache(ctx)?;
    if all {
        let removed = clear_games(&conn)?;
        success(format!("Removed {removed} cached record(s)"));
        return Ok(());
    }

    let name = name.ok_or_else(|| CliError::invalid_argument("a game name or --all is required"))?;
    match delete_game(&conn, name) {
        Ok(()) => success(format!("Forgot cached metadata for {name}")),
        Err(StoreError::NotFound { .. }) => warning(format!("No cached metadata for {name}")),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_describe_age() {
        let now = at("2024-03-10 12:00:00");
        assert_eq!(
            describe_age("2024-03-07 11:00:00", now).as_deref(),
            Some("3 days ago")
        );
        assert_eq!(
            describe_age("2024-03-10 11:00:00", now).as_deref(),
            Some("1 hour ago")
        );
        assert_eq!(
            describe_age("2024-03-10 11:58:30", now).as_deref(),
            Some("1 minute ago")
        );
        assert_eq!(
            describe_age("2024-03-10 12:00:00", now).as_deref(),
            Some("just now")
        );
        assert_eq!(describe_age("yesterday", now), None);
    }
}
