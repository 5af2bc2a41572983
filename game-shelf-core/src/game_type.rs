use std::path::Path;

use serde::{Deserialize, Serialize};

/// Console tags that mark a shortcut as a ROM launched through an emulator.
const CONSOLE_TAGS: &[&str] = &[
    "ps2",
    "psx",
    "n64",
    "gamecube",
    "wii",
    "dreamcast",
    "genesis",
    "snes",
    "nes",
    "gba",
    "nds",
    "psp",
    "mame",
    "c64",
    "amiga",
    "atari",
    "atari2600",
];

/// How a library entry is launched, inferred from its shortcut name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    PcGame,
    /// `Launch <game>` shortcuts created for DOSBox titles.
    Dosbox,
    /// ModEngine or other mod loader entry points.
    Mod,
    /// Anti-cheat protected launcher.
    Protected,
    /// Halo MCC launcher.
    Mcc,
    Startup,
    PreLauncher,
    /// ROM started through an emulator.
    Rom,
    /// Shortcut pointing at a batch script.
    Batch,
}

impl GameType {
    /// Classify a shortcut by its display name and (optional) target path.
    ///
    /// Name tags take precedence over the target extension.
    pub fn classify(shortcut_name: &str, target: Option<&Path>) -> Self {
        let lower = shortcut_name.to_lowercase();

        if lower.starts_with("launch ") || lower.contains(" launch ") {
            return Self::Dosbox;
        }
        if lower.contains("(modengine)") || lower.contains("(mod -") {
            return Self::Mod;
        }
        if lower.contains("(protected)") {
            return Self::Protected;
        }
        if lower.contains("(mcc launcher)") {
            return Self::Mcc;
        }
        if lower.contains("(startup)") {
            return Self::Startup;
        }
        if lower.contains("(pre-launcher)") {
            return Self::PreLauncher;
        }
        let has_console_tag = lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|token| CONSOLE_TAGS.contains(&token));
        if has_console_tag {
            return Self::Rom;
        }
        let is_batch = target
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("bat") || e.eq_ignore_ascii_case("cmd"));
        if is_batch {
            return Self::Batch;
        }
        Self::PcGame
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PcGame => "PC Game",
            Self::Dosbox => "DOSBox",
            Self::Mod => "Mod",
            Self::Protected => "Protected",
            Self::Mcc => "MCC",
            Self::Startup => "Startup",
            Self::PreLauncher => "Pre-Launcher",
            Self::Rom => "ROM",
            Self::Batch => "Batch",
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn name_tags_classify() {
        let cases = [
            ("Launch Dungeon Keeper", GameType::Dosbox),
            ("Elden Ring (ModEngine)", GameType::Mod),
            ("Dark Souls III (Mod - Darksouls3)", GameType::Mod),
            ("Elden Ring (Protected)", GameType::Protected),
            ("Halo (MCC Launcher)", GameType::Mcc),
            ("Some Game (Startup)", GameType::Startup),
            ("Some Game (Pre-Launcher)", GameType::PreLauncher),
            ("Okami (PS2)", GameType::Rom),
            ("Super Metroid (SNES)", GameType::Rom),
            ("Stardew Valley", GameType::PcGame),
        ];
        for (name, expected) in cases {
            assert_eq!(GameType::classify(name, None), expected, "{name}");
        }
    }

    #[test]
    fn console_tag_must_be_a_whole_word() {
        // "nes" inside "Business" is not a console tag
        assert_eq!(
            GameType::classify("Business Tycoon", None),
            GameType::PcGame
        );
    }

    #[test]
    fn batch_target_classifies_as_batch() {
        let target = PathBuf::from("C:/Games/Thing/run.bat");
        assert_eq!(
            GameType::classify("Thing", Some(&target)),
            GameType::Batch
        );
        // Name tags still win over the target
        assert_eq!(
            GameType::classify("Okami (PS2)", Some(&target)),
            GameType::Rom
        );
    }
}
