//! Archive commands: the interactive browser, batch downloads, and the
//! queue, history and filter files.

use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use game_shelf_archive::{
    BrowseHistory, Browser, BrowserOptions, DownloadQueue, DownloadStats, Downloader,
    ExcludeFilters, ReqwestFetcher, Session, SystemClipboard, download_platform, drain_queue,
    platform_files,
};
use game_shelf_core::{ArchivePlatform, Dataset};

use super::{AppContext, failure, heading, success, warning};
use crate::cli_types::{FilterAction, HistoryAction, QueueAction};
use crate::spinner::{download_observer, spinner};
use crate::{CliError, log_blank};

/// Run the interactive browser on stdin/stdout.
pub(crate) fn run_browse(
    ctx: &AppContext,
    dataset: Option<Dataset>,
    url: Option<String>,
) -> Result<(), CliError> {
    let http = ReqwestFetcher::new()?;
    let clipboard = SystemClipboard;
    let archive = &ctx.settings.archive;

    let session = Session {
        history: BrowseHistory::open(ctx.paths.history_file(), archive.history_limit)?,
        queue: DownloadQueue::open(ctx.paths.queue_file())?,
        filters: ExcludeFilters::load(&ctx.paths.filter_file())?,
        filter_path: ctx.paths.filter_file(),
        downloader: Downloader::new(&http, ctx.settings.download_dir(&ctx.paths)),
    };
    let options = BrowserOptions {
        dataset: dataset.unwrap_or(archive.dataset),
        page_size: archive.page_size,
        temp_dir: Some(ctx.paths.temp_dir()),
    };

    let stdin = std::io::stdin();
    let mut browser = Browser::new(
        &http,
        &clipboard,
        session,
        options,
        stdin.lock(),
        std::io::stdout(),
    );
    browser.run(url.as_deref())?;
    Ok(())
}

/// Non-interactive downloads: the queue file or one whole platform.
pub(crate) fn run_download(
    ctx: &AppContext,
    queue: bool,
    platform: Option<String>,
    max_files: Option<usize>,
    list_platforms: bool,
    dataset: Option<Dataset>,
    dir: Option<PathBuf>,
) -> Result<(), CliError> {
    if list_platforms {
        print_platforms();
        return Ok(());
    }
    if !queue && platform.is_none() {
        return Err(CliError::invalid_argument(
            "nothing to download: pass --queue, --platform or --list-platforms",
        ));
    }

    let http = ReqwestFetcher::new()?;
    let dir = dir.unwrap_or_else(|| ctx.settings.download_dir(&ctx.paths));
    let mut downloader =
        Downloader::new(&http, &dir).with_observer(download_observer(ctx.quiet));
    log::info!(
        "Download directory: {}",
        dir.display().if_supports_color(Stdout, |t| t.cyan())
    );

    if queue {
        let summary = drain_queue(&mut downloader, &ctx.paths.queue_file())?;
        if summary.attempted == 0 {
            log::info!("Download queue is empty");
            return Ok(());
        }
        if summary.requeued.is_empty() {
            success("Queue finished; queue file removed");
        } else {
            warning(format!(
                "{} failed download(s) left in the queue",
                summary.requeued.len()
            ));
        }
    } else if let Some(query) = platform {
        let platform = ArchivePlatform::lookup(&query)
            .map_err(|e| CliError::invalid_argument(e.to_string()))?;
        let dataset = dataset.unwrap_or(ctx.settings.archive.dataset);
        let filters = ExcludeFilters::load(&ctx.paths.filter_file())?;

        let pb = spinner(format!("Listing {}...", platform.directory), ctx.quiet);
        let listed = platform_files(&http, dataset.base_url(), &platform, &filters, max_files);
        pb.finish_and_clear();
        let files = listed?;

        if files.is_empty() {
            warning(format!("No ROM files found for {platform}"));
            return Ok(());
        }
        log::info!(
            "Downloading {} files for {} into {}",
            files.len(),
            platform,
            dir.join(platform.directory).display()
        );
        download_platform(&mut downloader, &platform, &files);
    }

    print_stats(downloader.stats());
    Ok(())
}

fn print_platforms() {
    heading("Archive platforms:");
    log_blank();
    for (i, platform) in ArchivePlatform::all().iter().enumerate() {
        log::info!(
            "  {:>2}. {} {}",
            i + 1,
            platform.directory,
            format!("({})", platform.abbreviation).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

fn print_stats(stats: &DownloadStats) {
    log_blank();
    heading("Download summary");
    for line in stats.summary_lines() {
        log::info!("  {line}");
    }
}

pub(crate) fn run_queue(ctx: &AppContext, action: QueueAction) -> Result<(), CliError> {
    let mut queue = DownloadQueue::open(ctx.paths.queue_file())?;
    match action {
        QueueAction::List => {
            if queue.is_empty() {
                log::info!("Download queue is empty");
                return Ok(());
            }
            heading(&format!("Download queue ({} items):", queue.len()));
            for (i, url) in queue.items().iter().enumerate() {
                log::info!("  {:>3}. {}", i + 1, url);
            }
        }
        QueueAction::Add { url } => {
            if queue.add(&url)? {
                success(format!("Added to queue: {url}"));
            } else {
                warning(format!("Already queued: {url}"));
            }
        }
        QueueAction::Clear => {
            let count = queue.len();
            queue.clear()?;
            success(format!("Cleared {count} queued item(s)"));
        }
    }
    Ok(())
}

pub(crate) fn run_history(ctx: &AppContext, action: HistoryAction) -> Result<(), CliError> {
    let mut history = BrowseHistory::open(
        ctx.paths.history_file(),
        ctx.settings.archive.history_limit,
    )?;
    match action {
        HistoryAction::List => {
            if history.is_empty() {
                log::info!("No browse history");
                return Ok(());
            }
            heading("Recently visited:");
            for (i, url) in history.entries().rev().enumerate() {
                log::info!("  {:>3}. {}", i + 1, url);
            }
        }
        HistoryAction::Clear => {
            history.clear()?;
            success("History cleared");
        }
    }
    Ok(())
}

pub(crate) fn run_filters(ctx: &AppContext, action: FilterAction) -> Result<(), CliError> {
    let path = ctx.paths.filter_file();
    let mut filters = ExcludeFilters::load(&path)?;
    match action {
        FilterAction::List => {
            if filters.is_empty() {
                log::info!("No active filters");
                return Ok(());
            }
            heading("Active filters:");
            for (i, pattern) in filters.patterns().iter().enumerate() {
                log::info!("  {:>2}. {}", i + 1, pattern);
            }
        }
        FilterAction::Add { text } => {
            if filters.add(&path, &text)? {
                success(format!("Filter added: '{text}'"));
            } else {
                warning("Filter already exists");
            }
        }
        FilterAction::Remove { text } => {
            if filters.remove(&path, &text)? {
                success("Filter removed");
            } else {
                failure(format!("No such filter: '{text}'"));
            }
        }
    }
    Ok(())
}
