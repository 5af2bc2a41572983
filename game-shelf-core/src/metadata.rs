//! Normalized game metadata.
//!
//! Every catalog (Steam, GOG, RAWG, ScreenScraper) answers with a different
//! JSON shape; scrapers convert their responses into [`GameMetadata`] so the
//! cache, library, and display code only ever see one record type.

use serde::{Deserialize, Serialize};

/// Summary prefix used by placeholder records built without any catalog data.
pub const BASIC_SUMMARY_PREFIX: &str = "Game: ";

/// Which catalog a metadata record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataSource {
    Steam,
    Gog,
    Rawg,
    ScreenScraper,
    Igdb,
    /// Built locally from the name alone.
    Basic,
}

impl MetadataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Steam => "steam",
            Self::Gog => "gog",
            Self::Rawg => "rawg",
            Self::ScreenScraper => "screenscraper",
            Self::Igdb => "igdb",
            Self::Basic => "basic",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Steam => "Steam",
            Self::Gog => "GOG",
            Self::Rawg => "RAWG",
            Self::ScreenScraper => "ScreenScraper",
            Self::Igdb => "IGDB",
            Self::Basic => "Basic",
        }
    }
}

impl std::fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for MetadataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "steam" => Ok(Self::Steam),
            "gog" => Ok(Self::Gog),
            "rawg" => Ok(Self::Rawg),
            "screenscraper" | "ss" => Ok(Self::ScreenScraper),
            "igdb" => Ok(Self::Igdb),
            "basic" => Ok(Self::Basic),
            _ => Err(format!("unknown metadata source: '{s}'")),
        }
    }
}

/// Descriptive data for one game, independent of where it came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// Name as reported by the catalog (may differ from the local name).
    pub name: String,
    pub source: Option<MetadataSource>,
    /// The catalog's own identifier (Steam app id, RAWG id, ...).
    pub source_id: Option<String>,
    pub cover_url: Option<String>,
    /// Rating on a 0-10 scale.
    pub rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub summary: String,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub release_date: Option<String>,
}

impl GameMetadata {
    pub fn new(name: impl Into<String>, source: MetadataSource) -> Self {
        Self {
            name: name.into(),
            source: Some(source),
            ..Default::default()
        }
    }

    /// Placeholder record for a game no catalog knows about.
    pub fn basic(name: &str) -> Self {
        Self {
            summary: format!(
                "{BASIC_SUMMARY_PREFIX}{name}\n\nNo detailed information available."
            ),
            platforms: vec!["PC".to_string()],
            ..Self::new(name, MetadataSource::Basic)
        }
    }

    /// True when the record carries a real description rather than a
    /// placeholder. The fallback chain stops at the first useful record.
    pub fn is_useful(&self) -> bool {
        let summary = self.summary.trim();
        !summary.is_empty() && !summary.starts_with(BASIC_SUMMARY_PREFIX)
    }
}

/// Turn a cover URL from a catalog response into an absolute `https` URL.
///
/// Protocol-relative URLs (`//cdn...`) get an `https:` prefix; host-relative
/// or bare paths are joined to `host` (e.g. `https://www.screenscraper.fr`).
pub fn normalize_cover_url(url: &str, host: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Some(url.to_string());
    }
    if let Some(rest) = url.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    let host = host.trim_end_matches('/');
    let path = url.trim_start_matches('/');
    Some(format!("{host}/{path}"))
}
