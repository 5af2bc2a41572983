use super::*;

const SAMPLE_INDEX: &str = r#"<!DOCTYPE html>
<html><body>
<h1>Index of /files/Redump/</h1>
<table id="list">
<tr><td><a href="../">Parent directory/</a></td></tr>
<tr><td><a href="Sony%20-%20PlayStation%202/" title="Sony - PlayStation 2">Sony - PlayStation 2/</a></td></tr>
<tr><td><a href="Nintendo%20-%20GameCube/">Nintendo - GameCube/</a></td></tr>
<tr><td><a href="arcade/">arcade/</a></td></tr>
<tr><td><a href="Zelda%20%28USA%29.zip">Zelda (USA).zip</a></td></tr>
<tr><td><a href="alpha.7z">alpha.7z</a></td></tr>
<tr><td><a href="alpha.7z">alpha.7z (mirror)</a></td></tr>
<tr><td><a href="?C=N&amp;O=D">Name</a></td></tr>
<tr><td><a href="https://discord.gg/example">Discord</a></td></tr>
<tr><td><a href="donate/">Donate</a></td></tr>
</table>
</body></html>
"#;

#[test]
fn test_classify_href() {
    let dir = classify_href("Sony%20-%20PlayStation/").unwrap();
    assert!(dir.is_directory);
    assert_eq!(dir.display_name, "Sony - PlayStation");
    assert_eq!(dir.raw_href, "Sony%20-%20PlayStation/");

    let file = classify_href("Game%20(USA).zip").unwrap();
    assert!(!file.is_directory);
    assert_eq!(file.display_name, "Game (USA).zip");

    for rejected in ["../", "..", "http://example.com/", "https://x/a.zip", "?C=M;O=A", "", "/"] {
        assert!(classify_href(rejected).is_none(), "{rejected:?} should be dropped");
    }
}

#[test]
fn test_trailing_slash_decides_kind() {
    let hrefs = ["a/", "b", "c.zip", "d%20e/", "f.tar.gz", "weird name/"];
    for href in hrefs {
        let entry = classify_href(href).unwrap();
        assert_eq!(entry.is_directory, href.ends_with('/'), "{href}");
    }
}

#[test]
fn test_parse_index() {
    let listing = parse_index(SAMPLE_INDEX);

    let dirs: Vec<&str> = listing
        .directories
        .iter()
        .map(|e| e.display_name.as_str())
        .collect();
    assert_eq!(
        dirs,
        vec!["arcade", "donate", "Nintendo - GameCube", "Sony - PlayStation 2"]
    );

    let files: Vec<&str> = listing.files.iter().map(|e| e.display_name.as_str()).collect();
    assert_eq!(files, vec!["alpha.7z", "Zelda (USA).zip"]);
    assert_eq!(listing.len(), 6);
    assert!(listing.entries().all(|e| !e.raw_href.starts_with("http")));
}

#[test]
fn test_site_links_are_dropped() {
    let listing = parse_index(SAMPLE_INDEX).without_site_links();
    assert!(listing.directories.iter().all(|e| e.display_name != "donate"));
    assert_eq!(listing.directories.len(), 3);
}

#[test]
fn test_exclude_filters_hide_files_only() {
    let filters = ExcludeFilters::from_patterns(["zelda", "arcade"]);
    let listing = parse_index(SAMPLE_INDEX).apply_filters(&filters);
    assert_eq!(listing.files.len(), 1);
    assert!(listing.directories.iter().any(|e| e.display_name == "arcade"));
}

#[test]
fn test_garbage_html_is_empty() {
    assert!(parse_index("").is_empty());
    assert!(parse_index("<html><a>no href</a><<<").is_empty());
}

#[test]
fn test_resolve_href() {
    let base = "https://myrient.erista.me/files/Redump/";
    assert_eq!(
        resolve_href(base, "Sony%20-%20PlayStation%202/").unwrap(),
        "https://myrient.erista.me/files/Redump/Sony%20-%20PlayStation%202/"
    );
    assert_eq!(
        resolve_href(base, "Sega - Saturn/").unwrap(),
        "https://myrient.erista.me/files/Redump/Sega%20-%20Saturn/"
    );
    assert!(resolve_href("not a url", "a/").is_err());
}

#[test]
fn test_platform_url() {
    assert_eq!(
        platform_url("https://myrient.erista.me/files/Redump/", "Sony - PlayStation 2"),
        "https://myrient.erista.me/files/Redump/Sony%20-%20PlayStation%202/"
    );
}

#[test]
fn test_fetch_index_saves_raw_page() {
    let dir = tempfile::tempdir().unwrap();
    let save_dir = dir.path().join("tmp");
    let url = "https://host/files/Redump/";
    let http = crate::fake_http::FakeHttp::new().with_page(url, SAMPLE_INDEX);

    let listing = fetch_index(&http, url, Some(&save_dir)).unwrap();

    assert!(!listing.is_empty());
    let saved = std::fs::read_to_string(save_dir.join(SAVED_INDEX_NAME)).unwrap();
    assert_eq!(saved, SAMPLE_INDEX);
}
