use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use game_shelf_lib::settings::{app_config_path, load_settings_string, set_value, settings_path};
use game_shelf_scraper::{CredentialSource, Credentials};

use super::{AppContext, heading, success};
use crate::cli_types::{ConfigAction, CredentialsAction};
use crate::{CliError, log_blank};

fn mask_value(s: &str) -> String {
    match s.get(..2) {
        Some(prefix) if s.len() > 2 => format!("{prefix}****"),
        _ => "****".to_string(),
    }
}

fn is_secret(field: &str) -> bool {
    field.ends_with("api_key") || field.ends_with("password") || field.ends_with("token")
}

fn print_path_status(label: &str, path: &std::path::Path) {
    let status = if path.exists() {
        "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "(not found)".if_supports_color(Stdout, |t| t.dimmed()).to_string()
    };
    log::info!(
        "  {label}: {} {status}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
}

pub(crate) fn run_config(ctx: &AppContext, action: ConfigAction) -> Result<(), CliError> {
    match action {
        ConfigAction::Path => log::info!("{}", settings_path().display()),
        ConfigAction::Show => show_config(ctx),
        ConfigAction::Set { key, value } => {
            set_value(&settings_path(), &key, &value)?;
            success(format!("Set {key} = {value}"));
        }
    }
    Ok(())
}

fn show_config(ctx: &AppContext) {
    heading("Settings");
    log_blank();
    let path = settings_path();
    print_path_status("Settings file", &path);
    print_path_status("App config", &app_config_path());
    print_path_status("Data directory", &ctx.paths.root);
    log_blank();

    match load_settings_string(&path) {
        Some(contents) if !contents.trim().is_empty() => {
            for line in contents.lines() {
                log::info!("  {line}");
            }
        }
        _ => log::info!(
            "  {}",
            "No settings file; using defaults".if_supports_color(Stdout, |t| t.dimmed())
        ),
    }
    log_blank();

    let archive = &ctx.settings.archive;
    log::info!("  Effective values:");
    log::info!("    archive.dataset       {}", archive.dataset.short_name());
    log::info!("    archive.page_size     {}", archive.page_size);
    log::info!("    archive.history_limit {}", archive.history_limit);
    log::info!(
        "    archive.download_dir  {}",
        ctx.settings.download_dir(&ctx.paths).display()
    );
    let library = &ctx.settings.library;
    if let Some(dir) = &library.shortcuts_dir {
        log::info!("    library.shortcuts_dir {}", dir.display());
    }
    if let Some(dir) = &library.roms_dir {
        log::info!("    library.roms_dir      {}", dir.display());
    }
    for dir in &library.games_dirs {
        log::info!("    library.games_dirs    {}", dir.display());
    }
    log::info!(
        "    default rating        {}",
        ctx.app_config.format_rating(ctx.app_config.behavior.default_rating)
    );
}

pub(crate) fn run_credentials(action: CredentialsAction) -> Result<(), CliError> {
    let path = game_shelf_scraper::config_path();
    match action {
        CredentialsAction::Path => match path {
            Some(p) => log::info!("{}", p.display()),
            None => {
                return Err(CliError::config("could not determine the config directory"));
            }
        },
        CredentialsAction::Show => {
            heading("Metadata catalog credentials");
            log_blank();
            match &path {
                Some(p) => print_path_status("Config file", p),
                None => log::info!(
                    "  Config file: {}",
                    "could not determine path".if_supports_color(Stdout, |t| t.red()),
                ),
            }
            log_blank();

            let creds = Credentials::load();
            let sources = game_shelf_scraper::credential_sources();
            for (field, source) in &sources.fields {
                let value = match source {
                    CredentialSource::Missing => None,
                    _ => creds.field_value(field).map(|v| {
                        if is_secret(field) {
                            mask_value(v)
                        } else {
                            v.to_string()
                        }
                    }),
                };
                let shown = match value {
                    Some(v) => v.if_supports_color(Stdout, |t| t.bold()).to_string(),
                    None => "-".if_supports_color(Stdout, |t| t.dimmed()).to_string(),
                };
                log::info!(
                    "  {:<28} {:<14} {}",
                    field,
                    shown,
                    format!("({source})").if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            log_blank();
            log::info!("Steam and GOG need no credentials; RAWG and ScreenScraper are skipped without them.");
        }
    }
    Ok(())
}
