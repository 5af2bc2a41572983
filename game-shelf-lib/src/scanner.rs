//! Directory scanners for installed games and ROM collections.
//!
//! The executable scanner walks an install folder, drops installers, crash
//! handlers and other tooling via a deny-list, groups what remains by the
//! top-level game directory and picks one primary executable per group.
//! The pick is a filename heuristic and is best-effort only.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LibError;

/// Extensions treated as launchable.
pub const EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "bat", "cmd", "msi", "com", "lnk"];

/// Lowercase substrings of file names that are never games.
pub const DEFAULT_DENY_LIST: &[&str] = &[
    // Uninstallers
    "unins000.exe",
    "unins001.exe",
    "unins002.exe",
    "uninst.exe",
    "uninstll.exe",
    "uninstall.exe",
    "uninstall vortex.exe",
    // Crash reporting
    "unitycrashhandler",
    "crashreportclient.exe",
    "crashpad_handler.exe",
    "crashreporter.exe",
    "crashsender",
    "crs-handler.exe",
    "createdump.exe",
    // Runtimes and redistributables
    "dxwebsetup.exe",
    "dxsetup.exe",
    "vcredist",
    "vc_redist",
    "dotnetfx",
    "ndp",
    "physx",
    "oalinst.exe",
    "ue4prereqsetup",
    "ueprereqsetup",
    "vulkanrt-",
    "microsoft .net framework",
    "microsoft visual c++",
    "dotnetprobe.exe",
    // Installers and setup
    "msiexec.exe",
    "setup.exe",
    "register.exe",
    "launcher-installer-windows",
    "social-club-setup.exe",
    "easyanticheat_setup.exe",
    "easyanticheat_eos_setup.exe",
    "install_easyanticheat_eos_setup.bat",
    "uninstall_easyanticheat_eos_setup.bat",
    "install_pspc_sdk_runtime.bat",
    // Store and launcher helpers
    "epicwebhelper.exe",
    "eosauthlauncher.exe",
    "rockstar-games-launcher.exe",
    "bf4webhelper.exe",
    "bf4x86webhelper.exe",
    "bflauncher.exe",
    "bflauncher_x86.exe",
    "battlelog-web-plugins.exe",
    "uwp_helper",
    "launcher.exe",
    "unrealcefsubprocess.exe",
    "apphost.exe",
    // Mod tooling
    "launchmod_",
    "modengine2_launcher.exe",
    "start_protected_game.exe",
    "modinstalleripc.exe",
    "injectorclix64.exe",
    // Misc tools
    "quicksfv.exe",
    "language selector.exe",
    "server.exe",
    "cleanup.exe",
    "elevate.exe",
    "7z.exe",
    "python.exe",
    "pythonw.exe",
    "zsync.exe",
    "zsyncmake.exe",
    "json_formatter.exe",
    "quickbms_4gb_files.exe",
    "arctool.exe",
    "compress_bitmaps.bat",
    "dowser.exe",
    "divine.exe",
    "run_",
    "openmw-",
];

/// Extensions treated as ROM or disc images.
pub const ROM_EXTENSIONS: &[&str] = &[
    // CD/DVD images
    "iso", "bin", "cue", "img", "mdf", "mds", "chd", "gdi", "cdi",
    // Cartridge ROMs
    "rom", "nes", "smc", "sfc", "gb", "gbc", "gba", "smd", "gen", "md", "a26",
    // Handhelds
    "nds", "3ds", "cia", "cci", "psp", "cso", "pbp",
    // N64
    "v64", "z64", "n64",
    // GameCube/Wii
    "gcm", "gcz", "wbfs", "wad",
    // Archives
    "zip", "7z", "rar",
    // Computers
    "d64", "t64", "tap", "adf", "ipf", "hdf",
];

/// Extension and deny-list rules for the executable scanner.
///
/// Loadable from JSON so the lists can be extended without a rebuild;
/// missing fields fall back to the built-in lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanRules {
    pub extensions: Vec<String>,
    pub deny: Vec<String>,
}

impl Default for ScanRules {
    fn default() -> Self {
        Self {
            extensions: EXECUTABLE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            deny: DEFAULT_DENY_LIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanRules {
    /// Load rules from a JSON file, or the built-in rules if it doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self, LibError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let mut rules: Self = serde_json::from_str(&contents)?;
                rules.normalize();
                Ok(rules)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn normalize(&mut self) {
        for ext in &mut self.extensions {
            *ext = ext.trim_start_matches('.').to_lowercase();
        }
        for pattern in &mut self.deny {
            *pattern = pattern.to_lowercase();
        }
    }

    /// Returns the deny-list pattern matching this file name, if any.
    pub fn denied_by(&self, file_name: &str) -> Option<&str> {
        let lower = file_name.to_lowercase();
        self.deny
            .iter()
            .find(|pattern| lower.contains(pattern.as_str()))
            .map(String::as_str)
    }

    fn accepts_extension(&self, path: &Path) -> bool {
        let ext_set = extension_set(&self.extensions);
        has_matching_extension(path, &ext_set)
    }
}

/// The executable chosen for one game directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCandidate {
    /// Top-level directory under the scan root (or the file name for
    /// executables sitting directly in the root).
    pub group: String,
    pub path: PathBuf,
    pub rank: u8,
    /// How many candidates the group had before selection.
    pub alternatives: usize,
}

/// Result of an executable scan.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// One entry per group, in group-name order.
    pub selected: Vec<ScanCandidate>,
    /// Files that matched an extension but hit the deny-list.
    pub excluded: Vec<PathBuf>,
}

/// Lowercase words that mark a `.lnk` as a game launcher rather than a
/// manual, readme or website link.
pub const LAUNCHER_SHORTCUT_WORDS: &[&str] = &["launch", "play", "start", "run"];

fn is_shortcut(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("lnk"))
}

/// True for a `.lnk` whose name contains one of [`LAUNCHER_SHORTCUT_WORDS`].
pub fn is_launcher_shortcut(path: &Path) -> bool {
    is_shortcut(path) && {
        let name = lower_file_name(path);
        LAUNCHER_SHORTCUT_WORDS.iter().any(|w| name.contains(w))
    }
}

/// Preference rank derived from the file name. Higher wins.
///
/// A launcher shortcut that already exists beats any executable; after that
/// `shipping` > `win64` > `launcher` > everything else. Other shortcuts rank 0.
pub fn preference_rank(path: &Path) -> u8 {
    if is_shortcut(path) {
        return if is_launcher_shortcut(path) { 4 } else { 0 };
    }
    let name = lower_file_name(path);
    if name.contains("shipping") {
        3
    } else if name.contains("win64") {
        2
    } else if name.contains("launcher") {
        1
    } else {
        0
    }
}

/// Pick the primary candidate: highest rank, ties broken by lowercase file
/// name and then by full path so the result never depends on walk order.
pub fn select_primary(candidates: &[PathBuf]) -> Option<(&PathBuf, u8)> {
    candidates
        .iter()
        .map(|p| (p, preference_rank(p)))
        .min_by(|(a, rank_a), (b, rank_b)| {
            rank_b
                .cmp(rank_a)
                .then_with(|| lower_file_name(a).cmp(&lower_file_name(b)))
                .then_with(|| a.cmp(b))
        })
}

/// Walk `root` recursively and select one executable per top-level group.
pub fn scan_executables(root: &Path, rules: &ScanRules) -> Result<ScanReport, LibError> {
    if !root.is_dir() {
        return Err(LibError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    walk_files(root, &mut files)?;

    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    let mut report = ScanReport::default();

    for path in files {
        if !rules.accepts_extension(&path) {
            continue;
        }
        if is_shortcut(&path) && !is_launcher_shortcut(&path) {
            log::debug!("Ignoring non-launcher shortcut {}", path.display());
            continue;
        }
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if let Some(pattern) = rules.denied_by(file_name) {
            log::debug!("Excluded {} (matches '{}')", path.display(), pattern);
            report.excluded.push(path);
            continue;
        }
        let group = top_level_group(root, &path);
        groups.entry(group).or_default().push(path);
    }

    for (group, candidates) in groups {
        if let Some((path, rank)) = select_primary(&candidates) {
            report.selected.push(ScanCandidate {
                group,
                path: path.clone(),
                rank,
                alternatives: candidates.len(),
            });
        }
    }

    Ok(report)
}

/// Walk a ROM tree and group ROM files by their immediate parent directory
/// (normally the system folder). Files in each group are sorted.
pub fn scan_roms(root: &Path) -> Result<BTreeMap<String, Vec<PathBuf>>, LibError> {
    if !root.is_dir() {
        return Err(LibError::NotADirectory(root.to_path_buf()));
    }

    let ext_set = extension_set(ROM_EXTENSIONS);
    let mut files = Vec::new();
    walk_files(root, &mut files)?;

    let mut systems: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in files {
        if !has_matching_extension(&path, &ext_set) {
            continue;
        }
        let system = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();
        systems.entry(system).or_default().push(path);
    }
    for roms in systems.values_mut() {
        roms.sort();
    }
    Ok(systems)
}

/// Display name for a ROM: the file stem minus common region tags, with the
/// system appended, e.g. `Okami (PS2)`.
pub fn rom_display_name(rom: &Path, system: &str) -> String {
    let stem = rom.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let mut name = stem.to_string();
    for tag in ["(USA)", "(EUR)", "(JPN)", "[USA]", "[EUR]", "[JPN]"] {
        name = name.replace(tag, "");
    }
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if system.is_empty() {
        name
    } else {
        format!("{name} ({system})")
    }
}

/// Program and arguments that start `rom` in `emulator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl std::fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.program.display())?;
        for arg in &self.args {
            if arg.starts_with('-') {
                write!(f, " {arg}")?;
            } else {
                write!(f, " \"{arg}\"")?;
            }
        }
        Ok(())
    }
}

/// Build the command line for a known emulator; unknown emulators get the
/// ROM path as their only argument.
pub fn emulator_command(emulator: &Path, rom: &Path) -> LaunchCommand {
    let name = lower_file_name(emulator);
    let rom_arg = rom.to_string_lossy().into_owned();

    let args: Vec<String> = if name.contains("pcsx2") {
        vec!["--fullscreen".into(), "--nogui".into(), rom_arg]
    } else if name.contains("epsxe") {
        vec!["-nogui".into(), "-loadbin".into(), rom_arg]
    } else if name.contains("dolphin") {
        vec!["-e".into(), rom_arg]
    } else if name.contains("winuae") {
        vec!["-f".into(), rom_arg]
    } else if name.contains("mame") {
        // MAME takes the set name, not a path
        let set = rom.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        vec![set.to_string()]
    } else {
        vec![rom_arg]
    };

    LaunchCommand {
        program: emulator.to_path_buf(),
        args,
    }
}

/// Build a lowercase extension set.
pub fn extension_set<S: AsRef<str>>(extensions: &[S]) -> HashSet<String> {
    extensions
        .iter()
        .map(|e| e.as_ref().to_lowercase())
        .collect()
}

/// Check if a path has an extension in the allowed set.
fn has_matching_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e.to_lowercase()))
        .unwrap_or(false)
}

fn lower_file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_lowercase())
        .unwrap_or_default()
}

/// First path component below `root`.
fn top_level_group(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .ok()
        .and_then(|rel| rel.components().next())
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string())
}

/// Collect all regular files under `dir`, sorted per directory.
/// Symlinked directories are not followed.
fn walk_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LibError> {
    let mut entries: Vec<std::fs::DirEntry> = std::fs::read_dir(dir)?.flatten().collect();
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };
        let path = entry.path();
        if file_type.is_dir() {
            if let Err(e) = walk_files(&path, out) {
                log::warn!("Skipping unreadable directory {}: {}", path.display(), e);
            }
        } else if file_type.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
