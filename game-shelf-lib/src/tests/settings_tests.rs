use super::*;

#[test]
fn missing_settings_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load_from(&dir.path().join("settings.toml")).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.archive.page_size, 50);
    assert_eq!(settings.archive.history_limit, 100);
}

#[test]
fn partial_settings_keep_defaults_for_missing_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[archive]\npage_size = 20\ndataset = \"no-intro\"\n").unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.archive.page_size, 20);
    assert_eq!(settings.archive.dataset, Dataset::NoIntro);
    assert_eq!(settings.archive.history_limit, 100);
    assert!(settings.library.games_dirs.is_empty());
}

#[test]
fn save_then_load_preserves_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");
    let mut settings = Settings::default();
    settings.archive.download_dir = Some(PathBuf::from("/tmp/roms"));
    settings.library.games_dirs = vec![PathBuf::from("D:/Games")];
    settings.save_to(&path).unwrap();

    assert_eq!(Settings::load_from(&path).unwrap(), settings);
    assert!(!path.with_file_name("settings.toml.tmp").exists());
}

#[test]
fn set_value_updates_one_key_and_keeps_unknown_ones() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[gui]\nzoom = 2\n\n[archive]\npage_size = 20\n").unwrap();

    set_value(&path, "archive.history_limit", "25").unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.archive.history_limit, 25);
    assert_eq!(settings.archive.page_size, 20);
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("zoom"), "unknown sections must survive: {raw}");
}

#[test]
fn set_value_rejects_bad_keys_and_types() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");

    assert!(matches!(
        set_value(&path, "page_size", "10"),
        Err(LibError::Settings(_))
    ));
    assert!(set_value(&path, "archive.page_size", "lots").is_err());
    assert!(!path.exists(), "a rejected value must not create the file");
}

#[test]
fn app_config_defaults_and_partial_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app_config.json");
    let defaults = AppConfig::load_from(&path);
    assert_eq!(defaults.behavior.default_rating, 7.0);
    assert_eq!(defaults.behavior.rating_range.max, 10.0);
    assert_eq!(defaults.color("accent"), Some("#0078d4"));

    std::fs::write(&path, r#"{"behavior": {"rating_precision": 2}}"#).unwrap();
    let config = AppConfig::load_from(&path);
    assert_eq!(config.behavior.rating_precision, 2);
    assert_eq!(config.behavior.default_rating, 7.0);
    assert_eq!(config.format_rating(8.5), "8.50");
    assert_eq!(config.appearance.theme, "dark");
}

#[test]
fn malformed_app_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app_config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(AppConfig::load_from(&path), AppConfig::default());
}

#[test]
fn data_paths_are_rooted() {
    let paths = DataPaths::new("/data/game-shelf");
    assert_eq!(
        paths.queue_file(),
        PathBuf::from("/data/game-shelf/download_queue.txt")
    );
    assert!(paths.filter_file().ends_with("rom-filter.txt"));
}
