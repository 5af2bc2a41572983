use super::*;

fn touch(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"").unwrap();
    path
}

#[test]
fn test_preference_rank() {
    assert_eq!(preference_rank(Path::new("Play Game.lnk")), 4);
    assert_eq!(preference_rank(Path::new("Launch DOOM.LNK")), 4);
    assert_eq!(preference_rank(Path::new("Manual.lnk")), 0);
    assert_eq!(preference_rank(Path::new("Game-Win64-Shipping.exe")), 3);
    assert_eq!(preference_rank(Path::new("game_win64.exe")), 2);
    assert_eq!(preference_rank(Path::new("GameLauncher.exe")), 1);
    assert_eq!(preference_rank(Path::new("game.exe")), 0);
}

#[test]
fn test_deny_list_is_case_insensitive_substring() {
    let rules = ScanRules::default();
    assert_eq!(rules.denied_by("UNINS000.EXE"), Some("unins000.exe"));
    assert!(rules.denied_by("vc_redist.x64.exe").is_some());
    assert!(rules.denied_by("UnityCrashHandler64.exe").is_some());
    assert!(rules.denied_by("Hades.exe").is_none());
}

#[test]
fn test_scan_selects_one_per_group() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "Hades/x64/Hades.exe");
    touch(root, "Hades/unins000.exe");
    touch(root, "Returnal/Returnal.exe");
    touch(root, "Returnal/Returnal/Binaries/Win64/Returnal-Win64-Shipping.exe");
    touch(root, "Returnal/readme.txt");
    touch(root, "Loose.exe");

    let report = scan_executables(root, &ScanRules::default()).unwrap();
    let groups: Vec<&str> = report.selected.iter().map(|c| c.group.as_str()).collect();
    assert_eq!(groups, vec!["Hades", "Loose.exe", "Returnal"]);

    let returnal = &report.selected[2];
    assert!(returnal.path.ends_with("Returnal-Win64-Shipping.exe"));
    assert_eq!(returnal.rank, 3);
    assert_eq!(returnal.alternatives, 2);

    assert_eq!(report.excluded.len(), 1);
    assert!(report.excluded[0].ends_with("unins000.exe"));
}

#[test]
fn test_scan_is_deterministic_on_ties() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "Game/zeta.exe");
    touch(root, "Game/Alpha.exe");
    touch(root, "Game/beta.bat");

    let first = scan_executables(root, &ScanRules::default()).unwrap();
    for _ in 0..3 {
        let again = scan_executables(root, &ScanRules::default()).unwrap();
        assert_eq!(again.selected, first.selected);
    }
    assert!(first.selected[0].path.ends_with("Alpha.exe"));
}

#[test]
fn test_existing_shortcut_wins() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "Game/Game-Win64-Shipping.exe");
    touch(root, "Game/Play Game.lnk");

    let report = scan_executables(root, &ScanRules::default()).unwrap();
    assert!(report.selected[0].path.ends_with("Play Game.lnk"));
}

#[test]
fn test_non_launcher_shortcut_never_selected() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "Game/Game.exe");
    touch(root, "Game/Manual.lnk");
    touch(root, "Docs/Readme.lnk");

    let report = scan_executables(root, &ScanRules::default()).unwrap();
    assert_eq!(report.selected.len(), 1);
    assert_eq!(report.selected[0].group, "Game");
    assert!(report.selected[0].path.ends_with("Game.exe"));
    assert_eq!(report.selected[0].alternatives, 1);
}

#[test]
fn test_scan_rejects_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        scan_executables(&missing, &ScanRules::default()),
        Err(LibError::NotADirectory(_))
    ));
}

#[test]
fn test_rules_from_json_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scanner.json");
    std::fs::write(&path, r#"{"deny": ["Helper"]}"#).unwrap();

    let rules = ScanRules::load_or_default(&path).unwrap();
    assert_eq!(rules.deny, vec!["helper".to_string()]);
    assert!(rules.extensions.iter().any(|e| e == "exe"));
    assert!(rules.denied_by("GameHelper.exe").is_some());
    // Built-in entries are replaced, not merged
    assert!(rules.denied_by("unins000.exe").is_none());

    let defaults = ScanRules::load_or_default(&dir.path().join("missing.json")).unwrap();
    assert_eq!(defaults, ScanRules::default());
}

#[test]
fn test_scan_roms_groups_by_system() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "PS2/Okami (USA).iso");
    touch(root, "PS2/notes.txt");
    touch(root, "SNES/Chrono Trigger (USA).sfc");
    touch(root, "SNES/EarthBound (USA).SFC");

    let systems = scan_roms(root).unwrap();
    assert_eq!(systems.keys().collect::<Vec<_>>(), vec!["PS2", "SNES"]);
    assert_eq!(systems["PS2"].len(), 1);
    assert_eq!(systems["SNES"].len(), 2);
    assert!(systems["SNES"][0].ends_with("Chrono Trigger (USA).sfc"));
}

#[test]
fn test_rom_display_name() {
    assert_eq!(
        rom_display_name(Path::new("Okami (USA).iso"), "PS2"),
        "Okami (PS2)"
    );
    assert_eq!(
        rom_display_name(Path::new("Tetris [JPN] (Rev 1).gb"), "GB"),
        "Tetris (Rev 1) (GB)"
    );
    assert_eq!(rom_display_name(Path::new("Doom.wad"), ""), "Doom");
}

#[test]
fn test_emulator_command() {
    let rom = Path::new("/roms/PS2/Okami.iso");
    let cmd = emulator_command(Path::new("/emu/pcsx2-qt.exe"), rom);
    assert_eq!(cmd.args, vec!["--fullscreen", "--nogui", "/roms/PS2/Okami.iso"]);

    let cmd = emulator_command(Path::new("/emu/Dolphin.exe"), rom);
    assert_eq!(cmd.args[0], "-e");

    let cmd = emulator_command(Path::new("/emu/mame64.exe"), Path::new("/roms/mame/pacman.zip"));
    assert_eq!(cmd.args, vec!["pacman"]);

    let cmd = emulator_command(Path::new("/emu/retroarch.exe"), rom);
    assert_eq!(cmd.args, vec!["/roms/PS2/Okami.iso"]);
    assert_eq!(
        cmd.to_string(),
        "\"/emu/retroarch.exe\" \"/roms/PS2/Okami.iso\""
    );
}
