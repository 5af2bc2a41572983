use serde::{Deserialize, Serialize};

pub mod game_type;
pub mod metadata;
pub mod platform;
pub mod util;

pub use game_type::GameType;
pub use metadata::{GameMetadata, MetadataSource};
pub use platform::{ArchivePlatform, PlatformParseError};

/// Root of the ROM archive. Both datasets live directly below it.
pub const ARCHIVE_ROOT: &str = "https://myrient.erista.me/files/";

/// The preservation dataset an archive listing belongs to.
///
/// - Redump covers disc-based systems (PS1, PS2, GameCube, Saturn, ...)
/// - No-Intro covers cartridge-based systems (NES, SNES, GBA, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dataset {
    #[default]
    Redump,
    NoIntro,
}

impl Dataset {
    /// Returns the base URL of this dataset's top-level index page.
    pub fn base_url(&self) -> &'static str {
        match self {
            Dataset::Redump => "https://myrient.erista.me/files/Redump/",
            Dataset::NoIntro => "https://myrient.erista.me/files/No-Intro/",
        }
    }

    /// Returns a human-readable name for this dataset.
    pub fn display_name(&self) -> &'static str {
        match self {
            Dataset::Redump => "Redump",
            Dataset::NoIntro => "No-Intro",
        }
    }

    /// Canonical CLI name.
    pub fn short_name(&self) -> &'static str {
        match self {
            Dataset::Redump => "redump",
            Dataset::NoIntro => "no-intro",
        }
    }

    /// The other dataset. Used by the browser's "switch dataset" command.
    pub fn toggled(&self) -> Self {
        match self {
            Dataset::Redump => Dataset::NoIntro,
            Dataset::NoIntro => Dataset::Redump,
        }
    }

    pub fn all() -> &'static [Dataset] {
        &[Dataset::Redump, Dataset::NoIntro]
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string cannot be parsed into a `Dataset`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown dataset: '{0}' (expected redump or no-intro)")]
pub struct DatasetParseError(pub String);

impl std::str::FromStr for Dataset {
    type Err = DatasetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redump" | "1" => Ok(Dataset::Redump),
            "no-intro" | "nointro" | "no_intro" | "2" => Ok(Dataset::NoIntro),
            _ => Err(DatasetParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_parses_cli_names() {
        assert_eq!("redump".parse::<Dataset>().unwrap(), Dataset::Redump);
        assert_eq!("No-Intro".parse::<Dataset>().unwrap(), Dataset::NoIntro);
        assert_eq!("nointro".parse::<Dataset>().unwrap(), Dataset::NoIntro);
        assert!("tosec".parse::<Dataset>().is_err());
    }

    #[test]
    fn dataset_urls_live_under_archive_root() {
        for dataset in Dataset::all() {
            assert!(dataset.base_url().starts_with(ARCHIVE_ROOT));
            assert!(dataset.base_url().ends_with('/'));
        }
    }

    #[test]
    fn toggled_switches_between_datasets() {
        assert_eq!(Dataset::Redump.toggled(), Dataset::NoIntro);
        assert_eq!(Dataset::NoIntro.toggled(), Dataset::Redump);
    }
}
