//! Shared application settings and file locations.
//!
//! Configuration lives in `~/.config/game-shelf/` (settings, credentials,
//! mapping overrides); state the tools write while running (queue, history,
//! ratings, favorites, metadata database) lives in `~/.local/share/game-shelf/`
//! or the platform equivalent reported by `dirs`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use game_shelf_core::Dataset;
use serde::{Deserialize, Serialize};

use crate::error::LibError;

const APP_DIR: &str = "game-shelf";

/// Directory holding user-editable configuration.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Directory holding state written by the tools.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Canonical path to the settings file: `~/.config/game-shelf/settings.toml`.
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

/// Path to the appearance/behavior config shared with the desktop frontend.
pub fn app_config_path() -> PathBuf {
    config_dir().join("app_config.json")
}

/// Well-known state files under [`data_dir`].
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Paths rooted at the platform data directory.
    pub fn standard() -> Self {
        Self::new(data_dir())
    }

    pub fn queue_file(&self) -> PathBuf {
        self.root.join("download_queue.txt")
    }

    pub fn history_file(&self) -> PathBuf {
        self.root.join("browse_history.txt")
    }

    pub fn filter_file(&self) -> PathBuf {
        self.root.join("rom-filter.txt")
    }

    pub fn ratings_file(&self) -> PathBuf {
        self.root.join("custom_ratings.json")
    }

    pub fn favorites_file(&self) -> PathBuf {
        self.root.join("favorites.json")
    }

    pub fn database_file(&self) -> PathBuf {
        self.root.join("games.db")
    }

    /// Scratch directory for the most recently fetched index page.
    pub fn temp_dir(&self) -> PathBuf {
        self.root.join("temp")
    }

    pub fn default_download_dir(&self) -> PathBuf {
        self.root.join("downloads")
    }
}

/// Contents of `settings.toml`. Every section and key is optional on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub archive: ArchiveSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveSettings {
    pub download_dir: Option<PathBuf>,
    pub dataset: Dataset,
    /// Entries per page in the browser. 0 disables pagination.
    pub page_size: usize,
    pub history_limit: usize,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            download_dir: None,
            dataset: Dataset::Redump,
            page_size: 50,
            history_limit: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Folder of shortcut files that make up the library.
    pub shortcuts_dir: Option<PathBuf>,
    /// Install folders scanned for game executables.
    pub games_dirs: Vec<PathBuf>,
    pub roms_dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the canonical path.
    pub fn load() -> Result<Self, LibError> {
        Self::load_from(&settings_path())
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, LibError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the whole settings file atomically.
    pub fn save_to(&self, path: &Path) -> Result<(), LibError> {
        let serialized = toml::to_string_pretty(self)?;
        write_atomic(path, &serialized)
    }

    /// Download directory, falling back to the data directory.
    pub fn download_dir(&self, paths: &DataPaths) -> PathBuf {
        self.archive
            .download_dir
            .clone()
            .unwrap_or_else(|| paths.default_download_dir())
    }
}

/// Set a single dotted key (e.g. `archive.page_size`) in a settings file.
///
/// Uses `toml::Value` for a surgical update so keys this version does not
/// know about are preserved. The value is stored as an integer, float or
/// boolean when it parses as one, otherwise as a string. The result must
/// still deserialize into [`Settings`]; otherwise nothing is written.
pub fn set_value(path: &Path, key: &str, raw: &str) -> Result<(), LibError> {
    let (section, field) = key
        .split_once('.')
        .ok_or_else(|| LibError::settings(format!("expected <section>.<key>, got '{key}'")))?;

    let mut doc: toml::Value = match std::fs::read_to_string(path) {
        Ok(contents) => contents.parse()?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            toml::Value::Table(Default::default())
        }
        Err(e) => return Err(e.into()),
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| LibError::settings("settings.toml root is not a table"))?;
    let section_value = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let section_table = section_value
        .as_table_mut()
        .ok_or_else(|| LibError::settings(format!("[{section}] is not a table")))?;
    section_table.insert(field.to_string(), parse_scalar(raw));

    let serialized = toml::to_string_pretty(&doc)?;
    // Reject values that would make the file unreadable on the next load
    toml::from_str::<Settings>(&serialized)?;
    write_atomic(path, &serialized)
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

fn parse_scalar(raw: &str) -> toml::Value {
    if let Ok(i) = raw.parse::<i64>() {
        toml::Value::Integer(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        toml::Value::Float(f)
    } else if let Ok(b) = raw.parse::<bool>() {
        toml::Value::Boolean(b)
    } else {
        toml::Value::String(raw.to_string())
    }
}

/// Write `contents` to `path` via a temp file and rename.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), LibError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Appearance and rating behavior shared with the desktop frontend
/// (`app_config.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub appearance: Appearance,
    pub behavior: Behavior,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    pub theme: String,
    pub colors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Behavior {
    pub auto_refresh_ratings: bool,
    pub confirm_rating_changes: bool,
    /// Decimal places shown for ratings.
    pub rating_precision: usize,
    /// Rating shown for games with neither a custom nor a downloaded rating.
    pub default_rating: f64,
    pub rating_range: RatingRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRange {
    pub min: f64,
    pub max: f64,
}

impl Default for Appearance {
    fn default() -> Self {
        let colors = [
            ("background", "#1e1e1e"),
            ("foreground", "#ffffff"),
            ("secondary_background", "#2d2d2d"),
            ("secondary_foreground", "#cccccc"),
            ("accent", "#0078d4"),
            ("accent_hover", "#106ebe"),
            ("success", "#107c10"),
            ("warning", "#ff8c00"),
            ("error", "#d13438"),
            ("border", "#404040"),
            ("selection", "#0078d4"),
            ("custom_rating", "#ffd700"),
            ("favorite", "#ffd700"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            theme: "dark".to_string(),
            colors,
        }
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            auto_refresh_ratings: true,
            confirm_rating_changes: false,
            rating_precision: 1,
            default_rating: 7.0,
            rating_range: RatingRange::default(),
        }
    }
}

impl Default for RatingRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10.0,
        }
    }
}

impl AppConfig {
    /// Load the app config. A missing or unreadable file yields defaults,
    /// with a warning for the unreadable case.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), LibError> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, &json)
    }

    /// Look up a color by name.
    pub fn color(&self, name: &str) -> Option<&str> {
        self.appearance.colors.get(name).map(String::as_str)
    }

    /// Format a rating with the configured precision.
    pub fn format_rating(&self, rating: f64) -> String {
        format!("{:.*}", self.behavior.rating_precision, rating)
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
