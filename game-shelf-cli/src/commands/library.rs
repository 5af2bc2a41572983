//! Library commands: scanning, listing, ratings, tags and favorites.

use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use game_shelf_lib::scanner::{emulator_command, rom_display_name};
use game_shelf_lib::settings::config_dir;
use game_shelf_lib::{
    CustomRatings, Favorites, LibraryContext, NameResolver, RatingOrigin, ScanRules,
    scan_executables, scan_roms,
};

use super::{AppContext, failure, heading, success, warning};
use crate::cli_types::{FavoriteAction, TagAction};
use crate::{CliError, log_blank};

/// Built-in name mappings, the user's overrides, and whatever can be
/// learned from the configured install folders.
fn name_resolver(ctx: &AppContext) -> NameResolver {
    let mut resolver = NameResolver::new();
    let overrides = config_dir().join("name_mappings.json");
    if let Err(e) = resolver.load_external(&overrides) {
        log::warn!("Ignoring {}: {}", overrides.display(), e);
    }
    let learned = resolver.scan_game_directories(&ctx.settings.library.games_dirs);
    if learned > 0 {
        log::debug!("Learned {learned} names from install folders");
    }
    resolver
}

fn open_ratings(ctx: &AppContext) -> Result<CustomRatings, CliError> {
    Ok(CustomRatings::open(ctx.paths.ratings_file())?
        .with_range(ctx.app_config.behavior.rating_range))
}

pub(crate) fn run_scan(
    ctx: &AppContext,
    dir: &Path,
    roms: bool,
    emulator: Option<PathBuf>,
) -> Result<(), CliError> {
    if roms {
        scan_rom_tree(dir, emulator.as_deref())
    } else {
        scan_install_folder(ctx, dir)
    }
}

fn scan_install_folder(ctx: &AppContext, dir: &Path) -> Result<(), CliError> {
    let rules = ScanRules::load_or_default(&config_dir().join("scanner.json"))?;
    let report = scan_executables(dir, &rules)?;
    let resolver = name_resolver(ctx);

    if report.selected.is_empty() {
        warning(format!("No game executables found in {}", dir.display()));
        return Ok(());
    }

    heading(&format!("Found {} games:", report.selected.len()));
    log_blank();
    for candidate in &report.selected {
        log::info!(
            "  {}",
            resolver
                .resolve(&candidate.group)
                .if_supports_color(Stdout, |t| t.bold())
        );
        log::info!(
            "    {} {}",
            candidate.path.display().if_supports_color(Stdout, |t| t.cyan()),
            format!(
                "(rank {}, {} candidate{})",
                candidate.rank,
                candidate.alternatives,
                if candidate.alternatives == 1 { "" } else { "s" }
            )
            .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    if !report.excluded.is_empty() {
        log_blank();
        log::info!(
            "{} executables skipped by the deny-list",
            report.excluded.len()
        );
        for path in &report.excluded {
            log::debug!("  excluded {}", path.display());
        }
    }
    Ok(())
}

fn scan_rom_tree(dir: &Path, emulator: Option<&Path>) -> Result<(), CliError> {
    let systems = scan_roms(dir)?;
    if systems.is_empty() {
        warning(format!("No ROMs found in {}", dir.display()));
        return Ok(());
    }

    for (system, roms) in &systems {
        heading(&format!("{system} ({} ROMs)", roms.len()));
        for rom in roms {
            log::info!("  {}", rom_display_name(rom, system));
            if let Some(emulator) = emulator {
                log::info!(
                    "    {}",
                    emulator_command(emulator, rom).if_supports_color(Stdout, |t| t.dimmed())
                );
            }
        }
        log_blank();
    }
    let total: usize = systems.values().map(Vec::len).sum();
    log::info!("{total} ROMs across {} systems", systems.len());
    Ok(())
}

pub(crate) fn run_library(ctx: &AppContext, dir: Option<PathBuf>) -> Result<(), CliError> {
    let dir = dir
        .or_else(|| ctx.settings.library.shortcuts_dir.clone())
        .ok_or_else(|| {
            CliError::invalid_argument(
                "no shortcuts folder: pass --dir or set library.shortcuts_dir",
            )
        })?;

    let resolver = name_resolver(ctx);
    let ratings = open_ratings(ctx)?;
    let favorites = Favorites::open(ctx.paths.favorites_file())?;
    let cache = match game_shelf_db::open_database(&ctx.paths.database_file()) {
        Ok(conn) => Some(conn),
        Err(e) => {
            warning(format!("Metadata cache unavailable: {e}"));
            None
        }
    };

    let library = LibraryContext {
        resolver: &resolver,
        ratings: &ratings,
        favorites: &favorites,
        default_rating: ctx.app_config.behavior.default_rating,
    };
    let entries = library.load(&dir, |name| {
        let conn = cache.as_ref()?;
        match game_shelf_db::find_game(conn, name) {
            Ok(found) => found.map(|cached| cached.metadata),
            Err(e) => {
                log::warn!("Cache lookup for '{name}' failed: {e}");
                None
            }
        }
    })?;

    if entries.is_empty() {
        log::info!("No shortcuts in {}", dir.display());
        return Ok(());
    }

    heading(&format!("Library ({} games):", entries.len()));
    log_blank();
    for entry in &entries {
        let star = if entry.favorite { "\u{2605}" } else { " " };
        let origin = match entry.rating_origin {
            RatingOrigin::Custom => "*",
            RatingOrigin::Downloaded => "",
            RatingOrigin::Default => "?",
        };
        let tags = if entry.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", entry.tags.join(", "))
        };
        log::info!(
            " {} {} {} {}{}{}",
            star.if_supports_color(Stdout, |t| t.yellow()),
            entry.name.if_supports_color(Stdout, |t| t.bold()),
            format!("({})", entry.game_type.label()).if_supports_color(Stdout, |t| t.dimmed()),
            ctx.app_config.format_rating(entry.rating),
            origin,
            tags.if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    log_blank();
    log::info!("* custom rating, ? default rating");
    Ok(())
}

pub(crate) fn run_rate(ctx: &AppContext, name: &str, value: f64) -> Result<(), CliError> {
    let mut ratings = open_ratings(ctx)?;
    ratings.set_custom_rating(name, value)?;
    success(format!(
        "Rated {name}: {}",
        ctx.app_config.format_rating(value)
    ));
    Ok(())
}

pub(crate) fn run_unrate(ctx: &AppContext, name: &str) -> Result<(), CliError> {
    let mut ratings = open_ratings(ctx)?;
    if ratings.remove_custom_rating(name)? {
        success(format!("Removed custom rating for {name}"));
    } else {
        warning(format!("{name} has no custom rating"));
    }
    Ok(())
}

pub(crate) fn run_tag(ctx: &AppContext, action: TagAction) -> Result<(), CliError> {
    let mut ratings = open_ratings(ctx)?;
    match action {
        TagAction::Set { name, tags } => {
            ratings.set_custom_tags_str(&name, &tags)?;
            let now = ratings.get_custom_tags(&name);
            if now.is_empty() {
                success(format!("Cleared tags for {name}"));
            } else {
                success(format!("Tags for {name}: {}", now.join(", ")));
            }
        }
        TagAction::Add { name, tag } => {
            if ratings.add_custom_tag(&name, &tag)? {
                success(format!("Tagged {name} with '{}'", tag.trim()));
            } else {
                warning(format!("{name} already has tag '{}'", tag.trim()));
            }
        }
        TagAction::Remove { name, tag } => {
            if ratings.remove_custom_tag(&name, &tag)? {
                success(format!("Removed tag '{}' from {name}", tag.trim()));
            } else {
                failure(format!("{name} has no tag '{}'", tag.trim()));
            }
        }
        TagAction::List { name: Some(name) } => {
            let tags = ratings.get_custom_tags(&name);
            if tags.is_empty() {
                log::info!("{name} has no custom tags");
            } else {
                log::info!("{name}: {}", tags.join(", "));
            }
        }
        TagAction::List { name: None } => {
            let all = ratings.all_unique_tags();
            if all.is_empty() {
                log::info!("No custom tags");
                return Ok(());
            }
            heading("Tags in use:");
            for tag in all {
                log::info!("  {tag}");
            }
        }
    }
    Ok(())
}

pub(crate) fn run_favorite(ctx: &AppContext, action: FavoriteAction) -> Result<(), CliError> {
    let mut favorites = Favorites::open(ctx.paths.favorites_file())?;
    match action {
        FavoriteAction::Add { name } => {
            if favorites.add(&name)? {
                success(format!("Added {name} to favorites"));
            } else {
                warning(format!("{name} is already a favorite"));
            }
        }
        FavoriteAction::Remove { name } => {
            if favorites.remove(&name)? {
                success(format!("Removed {name} from favorites"));
            } else {
                warning(format!("{name} is not a favorite"));
            }
        }
        FavoriteAction::List => {
            if favorites.list().is_empty() {
                log::info!("No favorites yet");
                return Ok(());
            }
            heading("Favorites:");
            for name in favorites.list() {
                log::info!("  \u{2605} {name}");
            }
        }
    }
    Ok(())
}
