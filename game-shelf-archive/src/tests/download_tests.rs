use super::*;
use crate::fake_http::{FakeHttp, FakeResponse};

fn body(s: &str) -> FakeResponse {
    FakeResponse::Body(s.as_bytes().to_vec())
}

#[test]
fn test_download_then_skip_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let http = FakeHttp::new().with("https://host/files/A.zip", body("rom-bytes"));
    let mut downloader = Downloader::new(&http, dir.path()).with_delays(Delays::none());

    let first = downloader.download("https://host/files/A.zip", "A.zip");
    let second = downloader.download("https://host/files/A.zip", "A.zip");

    assert_eq!(first, DownloadOutcome::Downloaded { bytes: 9 });
    assert_eq!(second, DownloadOutcome::Skipped);
    assert_eq!(http.request_count(), 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    let stats = downloader.stats();
    assert_eq!(stats.downloaded_files, 1);
    assert_eq!(stats.skipped_files, 1);
    assert_eq!(stats.total_files, 2);
    assert_eq!(stats.downloaded_size, 9);
    assert_eq!(stats.total_size, 9);
    assert_eq!(stats.success_rate(), 50.0);
}

#[test]
fn test_failures_are_counted_and_partial_files_removed() {
    let dir = tempfile::tempdir().unwrap();
    let http = FakeHttp::new()
        .with("https://host/gone.zip", FakeResponse::Status(500))
        .with("https://host/cut.zip", FakeResponse::Broken(vec![1; 20_000]))
        .with("https://host/ok.zip", body("ok"));
    let mut downloader = Downloader::new(&http, dir.path()).with_delays(Delays::none());

    let outcomes = downloader.download_all(&[
        ("https://host/gone.zip".into(), "gone.zip".into()),
        ("https://host/cut.zip".into(), "cut.zip".into()),
        ("https://host/ok.zip".into(), "ok.zip".into()),
    ]);

    assert_eq!(
        outcomes,
        vec![
            DownloadOutcome::Failed,
            DownloadOutcome::Failed,
            DownloadOutcome::Downloaded { bytes: 2 }
        ]
    );
    assert!(!dir.path().join("cut.zip").exists());
    assert!(!dir.path().join("gone.zip").exists());
    assert_eq!(downloader.stats().failed_files, 2);
}

#[test]
fn test_unsafe_filenames_fail_without_request() {
    let dir = tempfile::tempdir().unwrap();
    let http = FakeHttp::new();
    let mut downloader = Downloader::new(&http, dir.path()).with_delays(Delays::none());

    for name in ["", "..", "a/b.zip", "..\\x.zip"] {
        assert_eq!(downloader.download("https://host/x", name), DownloadOutcome::Failed);
    }
    assert_eq!(http.request_count(), 0);
    assert_eq!(downloader.stats().failed_files, 4);
}

#[test]
fn test_observer_sees_progress() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let dir = tempfile::tempdir().unwrap();
    let payload = vec![7u8; CHUNK_SIZE * 2 + 10];
    let http = FakeHttp::new().with("https://host/big.iso", FakeResponse::Body(payload));
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let mut downloader = Downloader::new(&http, dir.path())
        .with_delays(Delays::none())
        .with_observer(move |e| sink.borrow_mut().push(e.clone()));

    downloader.download("https://host/big.iso", "big.iso");

    let events = events.borrow();
    assert!(matches!(
        events.first(),
        Some(DownloadEvent::Started { content_length: Some(n), .. }) if *n == (CHUNK_SIZE * 2 + 10) as u64
    ));
    let progress = events
        .iter()
        .filter(|e| matches!(e, DownloadEvent::Progress { .. }))
        .count();
    assert_eq!(progress, 3);
    assert!(matches!(
        events.last(),
        Some(DownloadEvent::Finished { outcome: DownloadOutcome::Downloaded { .. }, .. })
    ));
}

#[test]
fn test_filename_from_url() {
    assert_eq!(filename_from_url("https://host/files/A.zip"), "A.zip");
    assert_eq!(
        filename_from_url("https://host/files/Game%20%28USA%29.7z?x=1"),
        "Game (USA).7z"
    );
    assert_eq!(filename_from_url("https://host/files/dir/"), "");
}

#[test]
fn test_drain_queue_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let downloads = dir.path().join("downloads");
    std::fs::create_dir_all(&downloads).unwrap();
    std::fs::write(downloads.join("A.zip"), b"already here").unwrap();

    let queue_path = dir.path().join("download_queue.txt");
    std::fs::write(
        &queue_path,
        "https://host/files/A.zip\nhttps://host/files/B.zip\n",
    )
    .unwrap();

    let http = FakeHttp::new()
        .with("https://host/files/A.zip", body("new A"))
        .with("https://host/files/B.zip", body("B"));
    let mut downloader = Downloader::new(&http, &downloads).with_delays(Delays::none());

    let summary = drain_queue(&mut downloader, &queue_path).unwrap();

    let stats = downloader.stats();
    assert_eq!(stats.downloaded_files, 1);
    assert_eq!(stats.skipped_files, 1);
    assert_eq!(stats.failed_files, 0);
    assert_eq!(summary.attempted, 2);
    assert!(summary.requeued.is_empty());
    assert!(!queue_path.exists());
    assert_eq!(std::fs::read(downloads.join("A.zip")).unwrap(), b"already here");
    assert_eq!(std::fs::read(downloads.join("B.zip")).unwrap(), b"B");
}

#[test]
fn test_drain_queue_requeues_failures() {
    let dir = tempfile::tempdir().unwrap();
    let queue_path = dir.path().join("download_queue.txt");
    std::fs::write(
        &queue_path,
        "https://host/files/A.zip\n\nhttps://host/files/missing.zip\n",
    )
    .unwrap();

    let http = FakeHttp::new().with("https://host/files/A.zip", body("A"));
    let mut downloader = Downloader::new(&http, dir.path()).with_delays(Delays::none());
    let summary = drain_queue(&mut downloader, &queue_path).unwrap();

    assert_eq!(summary.requeued, vec!["https://host/files/missing.zip"]);
    assert_eq!(
        std::fs::read_to_string(&queue_path).unwrap(),
        "https://host/files/missing.zip\n"
    );
}

#[test]
fn test_drain_missing_queue_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let http = FakeHttp::new();
    let mut downloader = Downloader::new(&http, dir.path());
    let summary = drain_queue(&mut downloader, &dir.path().join("none.txt")).unwrap();
    assert_eq!(summary, DrainSummary::default());
    assert_eq!(downloader.stats().total_files, 0);
}

#[test]
fn test_platform_files() {
    let platform = game_shelf_core::ArchivePlatform::lookup("ps2").unwrap();
    let listing = r#"<html>
        <a href="../">Parent</a>
        <a href="Okami%20%28USA%29.zip">Okami (USA).zip</a>
        <a href="Okami%20%28USA%29%20%28Demo%29.zip">demo</a>
        <a href="readme.txt">readme.txt</a>
        <a href="Zone%20of%20the%20Enders.7z">zoe</a>
        <a href="Area%2051.ISO">area</a>
    </html>"#;
    let http = FakeHttp::new().with_page(
        "https://host/Redump/Sony%20-%20PlayStation%202/",
        listing,
    );
    let filters = ExcludeFilters::from_patterns(["(demo)"]);

    let files = platform_files(&http, "https://host/Redump/", &platform, &filters, Some(2)).unwrap();
    assert_eq!(
        files,
        vec![
            (
                "https://host/Redump/Sony%20-%20PlayStation%202/Area%2051.ISO".to_string(),
                "Area 51.ISO".to_string()
            ),
            (
                "https://host/Redump/Sony%20-%20PlayStation%202/Okami%20%28USA%29.zip".to_string(),
                "Okami (USA).zip".to_string()
            ),
        ]
    );
}

#[test]
fn test_platform_download_uses_platform_subdirectory() {
    let dir = tempfile::tempdir().unwrap();
    let platform = game_shelf_core::ArchivePlatform::lookup("ps2").unwrap();
    let url = "https://host/Redump/Sony%20-%20PlayStation%202/Okami.zip";
    let http = FakeHttp::new().with(url, body("okami"));
    let mut downloader = Downloader::new(&http, dir.path()).with_delays(Delays::none());

    let outcomes =
        download_platform(&mut downloader, &platform, &[(url.to_string(), "Okami.zip".to_string())]);

    assert_eq!(outcomes, vec![DownloadOutcome::Downloaded { bytes: 5 }]);
    let target = dir.path().join(platform.directory).join("Okami.zip");
    assert_eq!(std::fs::read_to_string(target).unwrap(), "okami");
    assert!(!dir.path().join("Okami.zip").exists());
    assert_eq!(downloader.dir(), dir.path());
}
