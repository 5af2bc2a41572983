//! Display-name resolution for shortcut and executable names.
//!
//! Raw names such as `bf4` or `MCC-Win64-Shipping` are mapped through a
//! lookup table to `Battlefield 4` or `Halo: The Master Chief Collection`.
//! The compiled-in table is only a default: mapping files and directory
//! scans extend it at runtime. Names with no mapping get a mechanical
//! cleanup instead.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::LibError;

/// Default mappings from executable/shortcut stems to display names.
pub const BUILTIN_MAPPINGS: &[(&str, &str)] = &[
    // Elder Scrolls
    ("SkyrimSE", "The Elder Scrolls V: Skyrim Special Edition"),
    ("Skyrim", "The Elder Scrolls V: Skyrim"),
    ("Morrowind", "The Elder Scrolls III: Morrowind"),
    ("Oblivion", "The Elder Scrolls IV: Oblivion"),
    // Battlefield
    ("bf4", "Battlefield 4"),
    ("bf3", "Battlefield 3"),
    ("bf1", "Battlefield 1"),
    ("bfv", "Battlefield V"),
    ("bf2042", "Battlefield 2042"),
    // Ghost Recon
    ("GRW", "Tom Clancy's Ghost Recon Wildlands"),
    ("GSS2", "Tom Clancy's Ghost Recon Wildlands"),
    ("Ghost Recon Wildlands", "Tom Clancy's Ghost Recon Wildlands"),
    // Halo
    ("MCC-Win64-Shipping", "Halo: The Master Chief Collection"),
    ("HaloWars2_WinAppDX12Final", "Halo Wars 2"),
    ("MCC", "Halo: The Master Chief Collection"),
    // FromSoftware
    ("eldenring", "Elden Ring"),
    ("DarkSouls3", "Dark Souls III"),
    ("DarkSouls2", "Dark Souls II"),
    ("DarkSouls", "Dark Souls"),
    ("Sekiro", "Sekiro: Shadows Die Twice"),
    // Rockstar
    ("PlayRDR2", "Red Dead Redemption 2"),
    ("RDR2", "Red Dead Redemption 2"),
    ("GTA5", "Grand Theft Auto V"),
    ("GTA4", "Grand Theft Auto IV"),
    ("LANoire", "L.A. Noire"),
    // Ubisoft
    ("ACValhalla", "Assassin's Creed Valhalla"),
    ("ACOdyssey", "Assassin's Creed Odyssey"),
    ("ACOrigins", "Assassin's Creed Origins"),
    // Strategy
    ("stellaris", "Stellaris"),
    ("Civ6", "Sid Meier's Civilization VI"),
    ("Civ5", "Sid Meier's Civilization V"),
    ("TotalWar", "Total War"),
    ("DistantWorlds2", "Distant Worlds 2"),
    ("Frostpunk2", "Frostpunk 2"),
    ("Guild3", "The Guild 3"),
    ("TwilightStruggle", "Twilight Struggle"),
    ("TerraformingMars", "Terraforming Mars"),
    // RPG
    ("underrail", "Underrail"),
    ("openmw", "OpenMW"),
    ("ColonyShipGame", "Colony Ship"),
    ("Expedition33_Steam", "Expedition 33"),
    ("Roadwarden-32", "Roadwarden"),
    ("Tainted Grail", "Tainted Grail"),
    ("TheThaumaturge", "The Thaumaturge"),
    ("likeadragon8", "Like a Dragon 8"),
    // Final Fantasy
    ("ff2", "Final Fantasy II"),
    ("ff7", "Final Fantasy VII"),
    ("ff8", "Final Fantasy VIII"),
    ("ff9", "Final Fantasy IX"),
    ("ff10", "Final Fantasy X"),
    ("ff15", "Final Fantasy XV"),
    // Everything else
    ("rfg", "Red Faction Guerrilla"),
    ("cataclysm-tiles", "Cataclysm: Dark Days Ahead"),
    ("CelebrityPoker", "Celebrity Poker"),
    ("Chess2", "Chess 2"),
    ("CryptMaster", "Crypt Master"),
    ("DarkFuture", "Dark Future"),
    ("deadrising2otr", "Dead Rising 2: Off the Record"),
    ("EvilWest", "Evil West"),
    ("FactoryGameSteam", "Satisfactory"),
    ("FightingFantasy", "Fighting Fantasy"),
    ("GhostOfTsushima", "Ghost of Tsushima"),
    ("gorky17", "Gorky 17"),
    ("Gremlins_Inc", "Gremlins Inc"),
    ("hathor_Shipping_Playfab_Steam_x64", "Hathor"),
    ("HYPERVIOLENT", "Hyperviolent"),
    ("JustCause3", "Just Cause 3"),
    ("Konung2", "Konung 2"),
    ("Lord of the Rings - LCG", "Lord of the Rings: Living Card Game"),
    ("LoveLetter_Release", "Love Letter"),
    ("McPixel3", "McPixel 3"),
    ("NotForBroadcast", "Not For Broadcast"),
    ("OneDeckDungeon", "One Deck Dungeon"),
    ("PICAYUNEDREAMS", "Picayune Dreams"),
    ("PinballArcade", "Pinball Arcade"),
    ("PinballM", "Pinball M"),
    ("PokerNight2", "Poker Night 2"),
    ("ProjetCaillou", "Projet Caillou"),
    ("RainWorld", "Rain World"),
    ("Shenzhen", "Shenzhen I/O"),
    ("SlimeRancher2", "Slime Rancher 2"),
    ("starrealms", "Star Realms"),
    ("TabletopCreator", "Tabletop Creator"),
    ("TabletopPlayground", "Tabletop Playground"),
    ("TalesAndTactics", "Tales and Tactics"),
    ("TheInnSanity", "The Inn Sanity"),
    ("TheNecromancer", "The Necromancer"),
    ("TheQuarry", "The Quarry"),
    ("TheWitcherAdventureGame", "The Witcher Adventure Game"),
    ("Warhammer 40,000 Boltgun", "Warhammer 40,000: Boltgun"),
    ("WhosLila", "Who's Lila"),
    ("WorshippersOfCthulhu", "Worshippers of Cthulhu"),
];

/// Launcher and console tags appended to shortcut folder names.
pub const DIRECTORY_SUFFIXES: &[&str] = &[
    " (ModEngine)",
    " (Protected)",
    " (MCC Launcher)",
    " (Startup)",
    " (Pre-Launcher)",
    " (Mod - Armoredcore6)",
    " (Mod - Darksouls3)",
    " (Mod - Eldenring)",
    " (PS2)",
    " (PSX)",
    " (N64)",
    " (GameCube)",
    " (Wii)",
    " (Dreamcast)",
    " (Genesis)",
    " (SNES)",
    " (NES)",
    " (GBA)",
    " (NDS)",
    " (PSP)",
    " (MAME)",
    " (C64)",
    " (Amiga)",
    " (Atari2600)",
];

/// Build/store suffixes found on executable stems.
pub const EXECUTABLE_SUFFIXES: &[&str] = &[
    "-win64-shipping",
    "-shipping",
    "_x64",
    "_x86",
    "_win64",
    "_win32",
    "_steam",
    "_gog",
    "_epic",
    "_shipping",
    "_final",
    "_release",
    "_debug",
    "_test",
];

/// Maps raw game names to display names.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    exact: HashMap<String, String>,
    /// Lowercased key to display name for case-insensitive lookups.
    folded: HashMap<String, String>,
}

impl NameResolver {
    /// A resolver seeded with [`BUILTIN_MAPPINGS`].
    pub fn new() -> Self {
        let mut resolver = Self::empty();
        for (key, value) in BUILTIN_MAPPINGS {
            resolver.insert(*key, *value);
        }
        resolver
    }

    /// A resolver with no mappings at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or replace one mapping.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        self.folded.insert(key.to_lowercase(), value.clone());
        self.exact.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Merge a JSON object of `{ "raw": "Display Name" }` over the current
    /// table. A missing file is not an error. Returns the number of entries
    /// read.
    pub fn load_external(&mut self, path: &Path) -> Result<usize, LibError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let mappings: HashMap<String, String> = serde_json::from_str(&contents)?;
        let count = mappings.len();
        for (key, value) in mappings {
            self.insert(key, value);
        }
        log::debug!("Loaded {} name mappings from {}", count, path.display());
        Ok(count)
    }

    /// Learn mappings from the entries directly inside each directory:
    /// tagged folder names map to the folder name without its tag, and
    /// `.exe`/`.lnk` stems with build suffixes map to the bare stem.
    /// Existing mappings are never replaced. Returns how many were added.
    pub fn scan_game_directories(&mut self, directories: &[PathBuf]) -> usize {
        let mut added = 0;
        for dir in directories {
            let entries = match std::fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    log::debug!("Skipping {}: {}", dir.display(), e);
                    continue;
                }
            };
            for entry in entries.flatten() {
                let path = entry.path();
                let learned = if path.is_dir() {
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .and_then(|raw| clean_directory_name(raw).map(|c| (raw.to_string(), c)))
                } else if has_extension(&path, &["exe", "lnk"]) {
                    path.file_stem()
                        .and_then(|s| s.to_str())
                        .and_then(|raw| clean_executable_name(raw).map(|c| (raw.to_string(), c)))
                } else {
                    None
                };

                if let Some((raw, clean)) = learned
                    && !self.folded.contains_key(&raw.to_lowercase())
                {
                    self.insert(raw, clean);
                    added += 1;
                }
            }
        }
        added
    }

    /// Look up a mapping: exact key, then case-insensitive key, then the
    /// same again with a leading `Launch ` removed.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.exact.get(name) {
            return Some(value);
        }
        if let Some(value) = self.folded.get(&name.to_lowercase()) {
            return Some(value);
        }
        strip_launch_prefix(name).and_then(|rest| self.lookup(rest))
    }

    /// Display name for `name`: the mapped name if one exists, otherwise
    /// [`fallback_display_name`].
    pub fn resolve(&self, name: &str) -> String {
        match self.lookup(name) {
            Some(value) => value.to_string(),
            None => fallback_display_name(strip_launch_prefix(name).unwrap_or(name)),
        }
    }
}

fn strip_launch_prefix(name: &str) -> Option<&str> {
    let prefix = name.get(..7)?;
    if prefix.eq_ignore_ascii_case("launch ") {
        Some(name[7..].trim())
    } else {
        None
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Strip `suffix` from the end of `s`, ignoring ASCII case.
fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = s.len().checked_sub(suffix.len())?;
    if s.is_char_boundary(cut) && s[cut..].eq_ignore_ascii_case(suffix) {
        Some(&s[..cut])
    } else {
        None
    }
}

/// Remove launcher and console tags from a folder name.
/// Returns `None` when the name carries no known tag.
pub fn clean_directory_name(name: &str) -> Option<String> {
    let mut clean = name.to_string();
    for suffix in DIRECTORY_SUFFIXES {
        clean = clean.replace(suffix, "");
    }
    if clean == name {
        None
    } else {
        Some(clean.trim().to_string())
    }
}

/// Remove build/store suffixes from an executable stem.
/// Returns `None` when the stem carries no known suffix.
pub fn clean_executable_name(name: &str) -> Option<String> {
    let mut clean = name;
    loop {
        let stripped = EXECUTABLE_SUFFIXES
            .iter()
            .find_map(|suffix| strip_suffix_ignore_case(clean, suffix));
        match stripped {
            Some(rest) => clean = rest,
            None => break,
        }
    }
    if clean == name || clean.trim().is_empty() {
        None
    } else {
        Some(clean.trim().to_string())
    }
}

/// Mechanical cleanup for names with no mapping: drop build suffixes and
/// folder tags, turn `_`/`-` separators into spaces, drop `: ; ! ?`, and
/// collapse whitespace.
pub fn fallback_display_name(name: &str) -> String {
    let base = clean_executable_name(name).unwrap_or_else(|| name.to_string());
    let base = clean_directory_name(&base).unwrap_or(base);
    let replaced: String = base
        .chars()
        .filter(|c| !matches!(c, ':' | ';' | '!' | '?'))
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect();
    let collapsed = game_shelf_core::util::collapse_whitespace(&replaced);
    if collapsed.is_empty() {
        name.to_string()
    } else {
        collapsed
    }
}

/// Keyword groups checked in order; the first group with a hit wins.
const GENRE_KEYWORDS: &[(&str, &[&str])] = &[
    ("Strategy", &["strategy", "civilization", "total war", "stellaris"]),
    ("RPG", &["rpg", "role-playing", "elder scrolls", "fallout"]),
    ("Shooter", &["shooter", "fps", "battlefield", "call of duty"]),
    ("Simulation", &["simulation", "sim", "city", "tycoon"]),
    ("Puzzle", &["puzzle", "tetris", "sudoku"]),
    ("Racing", &["racing", "drive", "car", "motor"]),
    ("Sports", &["sports", "football", "soccer", "basketball"]),
    ("Fighting", &["fighting", "street fighter", "tekken", "mortal kombat"]),
    ("Platformer", &["platform", "mario", "sonic", "crash"]),
    ("Adventure", &["adventure", "point and click", "myst"]),
    ("Horror", &["horror", "resident evil", "silent hill", "fear"]),
    ("Action-Adventure", &["action", "tomb raider", "uncharted"]),
];

/// A rough genre guess from keywords in a display name.
pub fn genre_hint(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    GENRE_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(genre, _)| *genre)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_order() {
        let resolver = NameResolver::new();
        assert_eq!(resolver.resolve("bf4"), "Battlefield 4");
        assert_eq!(resolver.resolve("BF4"), "Battlefield 4");
        assert_eq!(resolver.resolve("Launch SkyrimSE"), "The Elder Scrolls V: Skyrim Special Edition");
        assert_eq!(resolver.resolve("launch eldenring"), "Elden Ring");
        assert_eq!(resolver.lookup("Unknown Thing"), None);
    }

    #[test]
    fn test_fallback_cleanup() {
        let resolver = NameResolver::empty();
        assert_eq!(resolver.resolve("Returnal-Win64-Shipping"), "Returnal");
        assert_eq!(resolver.resolve("hollow_knight_x64"), "hollow knight");
        assert_eq!(resolver.resolve("Elden Ring (ModEngine)"), "Elden Ring");
        assert_eq!(resolver.resolve("What?!"), "What");
        assert_eq!(resolver.resolve("Launch Doom"), "Doom");
        assert_eq!(resolver.resolve("???"), "???");
    }

    #[test]
    fn test_clean_names() {
        assert_eq!(clean_directory_name("Okami (PS2)").as_deref(), Some("Okami"));
        assert_eq!(clean_directory_name("Okami"), None);
        assert_eq!(clean_executable_name("Game_Steam_x64").as_deref(), Some("Game"));
        assert_eq!(clean_executable_name("Game"), None);
        assert_eq!(clean_executable_name("_x64"), None);
    }

    #[test]
    fn test_external_mappings_override_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("name_mappings.json");
        std::fs::write(&path, r#"{"bf4": "BF4 Custom", "hk": "Hollow Knight"}"#).unwrap();

        let mut resolver = NameResolver::new();
        assert_eq!(resolver.load_external(&path).unwrap(), 2);
        assert_eq!(resolver.resolve("bf4"), "BF4 Custom");
        assert_eq!(resolver.resolve("HK"), "Hollow Knight");
        assert_eq!(resolver.load_external(&dir.path().join("none.json")).unwrap(), 0);
    }

    #[test]
    fn test_scan_game_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Okami (PS2)")).unwrap();
        std::fs::create_dir(dir.path().join("Plain")).unwrap();
        std::fs::write(dir.path().join("Hades_x64.exe"), b"").unwrap();
        std::fs::write(dir.path().join("notes_x64.txt"), b"").unwrap();

        let mut resolver = NameResolver::empty();
        let added = resolver.scan_game_directories(&[dir.path().to_path_buf()]);
        assert_eq!(added, 2);
        assert_eq!(resolver.resolve("Okami (PS2)"), "Okami");
        assert_eq!(resolver.lookup("hades_x64"), Some("Hades"));
    }

    #[test]
    fn test_genre_hint() {
        assert_eq!(genre_hint("Sid Meier's Civilization VI"), Some("Strategy"));
        assert_eq!(genre_hint("Battlefield 4"), Some("Shooter"));
        assert_eq!(genre_hint("The Elder Scrolls V: Skyrim"), Some("RPG"));
        assert_eq!(genre_hint("Qwxz"), None);
    }
}
