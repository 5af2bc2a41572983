/// A system directory in the ROM archive, paired with the abbreviation
/// used for quick selection on the command line.
///
/// `directory` is the exact (unencoded) folder name used by the archive,
/// e.g. `"Sony - PlayStation 2"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArchivePlatform {
    pub directory: &'static str,
    pub abbreviation: &'static str,
}

const fn platform(directory: &'static str, abbreviation: &'static str) -> ArchivePlatform {
    ArchivePlatform {
        directory,
        abbreviation,
    }
}

/// All known archive platforms in menu order.
const ALL_PLATFORMS: &[ArchivePlatform] = &[
    // Nintendo
    platform("Nintendo - Nintendo Entertainment System", "NES"),
    platform("Nintendo - Super Nintendo Entertainment System", "SNES"),
    platform("Nintendo - Nintendo 64", "N64"),
    platform("Nintendo - Nintendo GameCube", "NGC"),
    platform("Nintendo - Nintendo Wii", "WII"),
    platform("Nintendo - Nintendo Wii U", "WIIU"),
    platform("Nintendo - Nintendo Switch", "NSW"),
    // Sony
    platform("Sony - PlayStation", "PS1"),
    platform("Sony - PlayStation 2", "PS2"),
    platform("Sony - PlayStation 3", "PS3"),
    platform("Sony - PlayStation 4", "PS4"),
    platform("Sony - PlayStation 5", "PS5"),
    platform("Sony - PlayStation Portable", "PSP"),
    platform("Sony - PlayStation Vita", "PSV"),
    // Microsoft
    platform("Microsoft - Xbox", "XBOX"),
    platform("Microsoft - Xbox 360", "X360"),
    platform("Microsoft - Xbox One", "XONE"),
    platform("Microsoft - Xbox Series X|S", "XSX"),
    // Sega
    platform("Sega - Master System", "SMS"),
    platform("Sega - Mega Drive - Genesis", "MD"),
    platform("Sega - Sega CD", "SCD"),
    platform("Sega - Sega 32X", "32X"),
    platform("Sega - Sega Saturn", "SAT"),
    platform("Sega - Dreamcast", "DC"),
    // Atari
    platform("Atari - 2600", "A2600"),
    platform("Atari - 5200", "A5200"),
    platform("Atari - 7800", "A7800"),
    platform("Atari - Jaguar", "JAG"),
    platform("Atari - Lynx", "LYNX"),
    // NEC
    platform("NEC - PC Engine - TurboGrafx-16", "PCE"),
    platform("NEC - PC Engine CD - TurboGrafx-CD", "PCE-CD"),
    platform("NEC - PC Engine SuperGrafx", "SGX"),
    platform("NEC - PC-FX", "PCFX"),
    // SNK
    platform("SNK - Neo Geo", "NEO"),
    platform("SNK - Neo Geo CD", "NGCD"),
    platform("SNK - Neo Geo Pocket", "NGP"),
    platform("SNK - Neo Geo Pocket Color", "NGPC"),
    // Bandai
    platform("Bandai - WonderSwan", "WS"),
    platform("Bandai - WonderSwan Color", "WSC"),
    // Computers
    platform("Commodore - Amiga", "AMIGA"),
    platform("Commodore - Commodore 64", "C64"),
    platform("Commodore - Amiga CD32", "CD32"),
    platform("Apple - Apple II", "APPLE2"),
    platform("Apple - Macintosh", "MAC"),
    platform("IBM - PC", "PC"),
    platform("IBM - PC DOS", "DOS"),
];

impl ArchivePlatform {
    /// All platforms in menu order.
    pub fn all() -> &'static [ArchivePlatform] {
        ALL_PLATFORMS
    }

    /// Resolve a user query to a platform.
    ///
    /// Tried in order:
    /// 1. a 1-based menu number
    /// 2. an abbreviation (`ps2`, `NGC`)
    /// 3. the exact directory name
    /// 4. a case-insensitive substring of the directory name (first match wins)
    pub fn lookup(query: &str) -> Result<ArchivePlatform, PlatformParseError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(PlatformParseError(query.to_string()));
        }

        if let Ok(n) = trimmed.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| ALL_PLATFORMS.get(i))
                .copied()
                .ok_or_else(|| PlatformParseError(query.to_string()));
        }

        let lower = trimmed.to_lowercase();
        ALL_PLATFORMS
            .iter()
            .find(|p| p.abbreviation.to_lowercase() == lower)
            .or_else(|| {
                ALL_PLATFORMS
                    .iter()
                    .find(|p| p.directory.to_lowercase() == lower)
            })
            .or_else(|| {
                ALL_PLATFORMS
                    .iter()
                    .find(|p| p.directory.to_lowercase().contains(&lower))
            })
            .copied()
            .ok_or_else(|| PlatformParseError(query.to_string()))
    }
}

impl std::fmt::Display for ArchivePlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.directory, self.abbreviation)
    }
}

/// Error returned when a string cannot be resolved to an `ArchivePlatform`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown platform: '{0}'")]
pub struct PlatformParseError(pub String);

impl std::str::FromStr for ArchivePlatform {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

#[cfg(test)]
#[path = "tests/platform_tests.rs"]
mod tests;
