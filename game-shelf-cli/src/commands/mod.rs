pub(crate) mod archive;
pub(crate) mod config;
pub(crate) mod library;
pub(crate) mod metadata;

use std::fmt::Display;

use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};

use game_shelf_lib::settings::{app_config_path, settings_path};
use game_shelf_lib::{AppConfig, DataPaths, Settings};

use crate::CliError;

/// Settings and file locations shared by every command.
pub(crate) struct AppContext {
    pub paths: DataPaths,
    pub settings: Settings,
    pub app_config: AppConfig,
    pub quiet: bool,
}

impl AppContext {
    pub(crate) fn load(quiet: bool) -> Result<Self, CliError> {
        let settings = Settings::load_from(&settings_path())?;
        let app_config = AppConfig::load_from(&app_config_path());
        Ok(Self {
            paths: DataPaths::standard(),
            settings,
            app_config,
            quiet,
        })
    }
}

pub(crate) fn success(msg: impl Display) {
    log::info!(
        "{} {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        msg
    );
}

pub(crate) fn warning(msg: impl Display) {
    log::warn!(
        "{} {}",
        "\u{26A0}".if_supports_color(Stderr, |t| t.yellow()),
        msg
    );
}

pub(crate) fn failure(msg: impl Display) {
    log::error!(
        "{} {}",
        "\u{2718}".if_supports_color(Stderr, |t| t.red()),
        msg
    );
}

/// Bold section heading.
pub(crate) fn heading(title: &str) {
    log::info!("{}", title.if_supports_color(Stdout, |t| t.bold()));
}
