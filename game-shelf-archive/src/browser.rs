//! The interactive archive browser.
//!
//! A line-oriented menu loop over any `BufRead`/`Write` pair. Directory
//! navigation keeps an explicit stack for "back"; every listing visited is
//! also appended to the persisted [`BrowseHistory`]. End of input quits the
//! whole session.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use game_shelf_core::util::format_size;
use game_shelf_core::{ARCHIVE_ROOT, Dataset};
use owo_colors::{OwoColorize, Stream::Stdout};

use crate::clipboard::Clipboard;
use crate::download::{DownloadOutcome, DownloadStats, Downloader, drain_queue, filename_from_url};
use crate::error::ArchiveError;
use crate::filters::ExcludeFilters;
use crate::history::BrowseHistory;
use crate::http::HttpFetch;
use crate::index::{DirectoryEntry, fetch_index, resolve_href};
use crate::queue::DownloadQueue;

/// Display options for a browser session.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub dataset: Dataset,
    /// Entries per page; 0 shows everything on one page.
    pub page_size: usize,
    /// Where the last fetched index page is saved, if anywhere.
    pub temp_dir: Option<PathBuf>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            dataset: Dataset::default(),
            page_size: 50,
            temp_dir: None,
        }
    }
}

/// Persistent state a session reads and writes.
pub struct Session<'a> {
    pub history: BrowseHistory,
    pub queue: DownloadQueue,
    pub filters: ExcludeFilters,
    pub filter_path: PathBuf,
    pub downloader: Downloader<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Nav {
    Enter(String),
    Back,
    Quit,
}

const RULE: &str = "============================================================";

pub struct Browser<'a, R, W> {
    http: &'a dyn HttpFetch,
    clipboard: &'a dyn Clipboard,
    session: Session<'a>,
    options: BrowserOptions,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Browser<'a, R, W> {
    pub fn new(
        http: &'a dyn HttpFetch,
        clipboard: &'a dyn Clipboard,
        session: Session<'a>,
        options: BrowserOptions,
        input: R,
        out: W,
    ) -> Self {
        Self {
            http,
            clipboard,
            session,
            options,
            input,
            out,
        }
    }

    pub fn dataset(&self) -> Dataset {
        self.options.dataset
    }

    pub fn stats(&self) -> &DownloadStats {
        self.session.downloader.stats()
    }

    /// Give back the session state, e.g. to inspect it after a run.
    pub fn into_session(self) -> Session<'a> {
        self.session
    }

    /// Run the main menu until the user quits or input ends. With a
    /// `start_url` the session opens directly on that listing.
    pub fn run(&mut self, start_url: Option<&str>) -> Result<(), ArchiveError> {
        if let Some(url) = start_url
            && self.browse(url.to_string())? == Flow::Quit
        {
            return self.finish();
        }

        loop {
            let title = format!("ROM Browser - {} Dataset", self.options.dataset);
            writeln!(self.out)?;
            writeln!(self.out, "{}", title.if_supports_color(Stdout, |t| t.cyan()))?;
            writeln!(self.out, "{}", &RULE[..40])?;
            writeln!(self.out, "1. Browse ROMs")?;
            writeln!(self.out, "2. Switch dataset")?;
            writeln!(self.out, "3. Manage filters")?;
            writeln!(self.out, "4. View download queue")?;
            writeln!(self.out, "5. Help")?;
            writeln!(self.out, "6. Quit")?;

            let Some(choice) = self.prompt("Enter choice:")? else {
                break;
            };
            let flow = match choice.to_lowercase().as_str() {
                "1" => self.browse(self.options.dataset.base_url().to_string())?,
                "2" => {
                    self.options.dataset = self.options.dataset.toggled();
                    let msg = format!("Switched to {} dataset", self.options.dataset);
                    self.success(&msg)?;
                    Flow::Continue
                }
                "3" => self.manage_filters()?,
                "4" | "d" => self.queue_menu()?,
                "5" | "h" | "help" => {
                    self.show_help()?;
                    Flow::Continue
                }
                "6" | "q" | "quit" | "exit" => Flow::Quit,
                _ => {
                    self.error("Invalid choice")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
        }
        self.finish()
    }

    fn finish(&mut self) -> Result<(), ArchiveError> {
        writeln!(self.out)?;
        self.success("ROM Browser session ended")?;
        let queue = format!("Download queue saved to: {}", self.session.queue.path().display());
        let history = format!("History saved to: {}", self.session.history.path().display());
        self.info(&queue)?;
        self.info(&history)?;
        if self.stats().total_files > 0 {
            for line in self.stats().summary_lines() {
                writeln!(self.out, "{line}")?;
            }
        }
        Ok(())
    }

    /// Navigate from `start` until the user backs out of it or quits.
    fn browse(&mut self, start: String) -> Result<Flow, ArchiveError> {
        let mut stack = vec![start];
        while let Some(url) = stack.last().cloned() {
            match self.show_directory(&url)? {
                Nav::Enter(child) => stack.push(child),
                Nav::Back => {
                    stack.pop();
                }
                Nav::Quit => return Ok(Flow::Quit),
            }
        }
        Ok(Flow::Continue)
    }

    fn is_top_level(url: &str) -> bool {
        url == ARCHIVE_ROOT || Dataset::all().iter().any(|d| d.base_url() == url)
    }

    fn show_directory(&mut self, url: &str) -> Result<Nav, ArchiveError> {
        writeln!(self.out)?;
        self.info(&format!("Current location: {url}"))?;
        self.info(&format!("Dataset: {}", self.options.dataset))?;

        let listing = match fetch_index(self.http, url, self.options.temp_dir.as_deref()) {
            Ok(listing) => listing,
            Err(e) => {
                self.error(&format!("Failed to download index: {e}"))?;
                return Ok(Nav::Back);
            }
        };
        if let Err(e) = self.session.history.push(url) {
            log::warn!("Could not update history: {e}");
        }

        let listing = if Self::is_top_level(url) {
            listing.without_site_links()
        } else {
            listing
        };
        let listing = listing.apply_filters(&self.session.filters);
        if listing.is_empty() {
            self.warn("No items found in this directory")?;
            return Ok(Nav::Back);
        }

        let entries: Vec<DirectoryEntry> = listing.entries().cloned().collect();
        let mut view: Vec<usize> = (0..entries.len()).collect();
        let mut page = 0;

        loop {
            let pages = self.page_count(view.len());
            self.show_page(&entries, &view, page, pages)?;

            let prompt = format!("Enter choice (1-{}) or command:", view.len());
            let Some(input) = self.prompt(&prompt)? else {
                return Ok(Nav::Quit);
            };
            match input.to_lowercase().as_str() {
                "" => {}
                "q" | "quit" | "exit" => return Ok(Nav::Quit),
                "b" | "back" => return Ok(Nav::Back),
                "h" | "help" => self.show_help()?,
                "d" | "download" => {
                    if self.queue_menu()? == Flow::Quit {
                        return Ok(Nav::Quit);
                    }
                }
                "n" | "next" => {
                    if page + 1 < pages {
                        page += 1;
                    } else {
                        self.warn("Already on the last page")?;
                    }
                }
                "p" | "prev" => {
                    if page > 0 {
                        page -= 1;
                    } else {
                        self.warn("Already on the first page")?;
                    }
                }
                "f" | "filter" => {
                    let Some(needle) = self.prompt("Filter text (empty shows all):")? else {
                        return Ok(Nav::Quit);
                    };
                    let needle = needle.to_lowercase();
                    let matched: Vec<usize> = (0..entries.len())
                        .filter(|&i| entries[i].display_name.to_lowercase().contains(&needle))
                        .collect();
                    if matched.is_empty() {
                        self.warn(&format!("No items match '{needle}'"))?;
                    } else {
                        view = matched;
                        page = 0;
                    }
                }
                _ => match input.parse::<usize>() {
                    Ok(n) if (1..=view.len()).contains(&n) => {
                        let entry = &entries[view[n - 1]];
                        let target = match resolve_href(url, &entry.raw_href) {
                            Ok(target) => target,
                            Err(e) => {
                                self.error(&e.to_string())?;
                                continue;
                            }
                        };
                        if entry.is_directory {
                            return Ok(Nav::Enter(target));
                        }
                        let name = entry.display_name.clone();
                        if self.file_menu(&name, &target)? == Flow::Quit {
                            return Ok(Nav::Quit);
                        }
                    }
                    Ok(_) => {
                        let msg = format!(
                            "Invalid choice. Please enter a number between 1 and {}",
                            view.len()
                        );
                        self.error(&msg)?;
                    }
                    Err(_) => self.error("Invalid input. Please enter a number or command")?,
                },
            }
        }
    }

    fn page_count(&self, items: usize) -> usize {
        match self.options.page_size {
            0 => 1,
            size => items.div_ceil(size).max(1),
        }
    }

    fn show_page(
        &mut self,
        entries: &[DirectoryEntry],
        view: &[usize],
        page: usize,
        pages: usize,
    ) -> Result<(), ArchiveError> {
        let total = view.len();
        let (start, end) = match self.options.page_size {
            0 => (0, total),
            size => (page * size, ((page + 1) * size).min(total)),
        };

        let header = format!(
            "(Page {}/{}) - Items {}-{} of {}",
            page + 1,
            pages,
            start + 1,
            end,
            total
        );
        writeln!(self.out)?;
        writeln!(self.out, "{}", header.if_supports_color(Stdout, |t| t.cyan()))?;
        writeln!(self.out, "{RULE}")?;
        for (offset, &idx) in view[start..end].iter().enumerate() {
            let entry = &entries[idx];
            let suffix = if entry.is_directory { "/" } else { "" };
            writeln!(self.out, "{:3}. {}{}", start + offset + 1, entry.display_name, suffix)?;
        }
        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, "Commands: n/p page, f filter, d queue, b back, h help, q quit")?;
        Ok(())
    }

    fn file_menu(&mut self, name: &str, url: &str) -> Result<Flow, ArchiveError> {
        loop {
            writeln!(self.out)?;
            self.info(&format!("File selected: {name}"))?;
            writeln!(self.out, "1. Show URL")?;
            writeln!(self.out, "2. Copy URL to clipboard")?;
            writeln!(self.out, "3. Add to download queue")?;
            writeln!(self.out, "4. Download now")?;
            writeln!(self.out, "b. Back")?;

            let Some(choice) = self.prompt("Enter choice:")? else {
                return Ok(Flow::Quit);
            };
            match choice.to_lowercase().as_str() {
                "1" => self.success(&format!("URL: {url}"))?,
                "2" => match self.clipboard.copy(url) {
                    Ok(()) => self.success("URL copied to clipboard")?,
                    Err(e) => self.error(&format!("Failed to copy to clipboard: {e}"))?,
                },
                "3" => match self.session.queue.add(url) {
                    Ok(true) => self.success(&format!("Added to queue: {name}"))?,
                    Ok(false) => self.warn(&format!("Item already in queue: {name}"))?,
                    Err(e) => self.error(&format!("Could not update queue: {e}"))?,
                },
                "4" => {
                    let filename = filename_from_url(url);
                    let outcome = self.session.downloader.download(url, &filename);
                    let dir = self.session.downloader.dir().display().to_string();
                    match outcome {
                        DownloadOutcome::Downloaded { bytes } => self.success(&format!(
                            "Downloaded {filename} ({}) to {dir}",
                            format_size(bytes)
                        ))?,
                        DownloadOutcome::Skipped => {
                            self.warn(&format!("Already downloaded: {filename}"))?
                        }
                        DownloadOutcome::Failed => {
                            self.error(&format!("Download failed: {filename}"))?
                        }
                    }
                }
                "b" | "back" => {}
                "q" | "quit" | "exit" => return Ok(Flow::Quit),
                _ => {
                    self.error("Invalid choice")?;
                    continue;
                }
            }
            return Ok(Flow::Continue);
        }
    }

    fn queue_menu(&mut self) -> Result<Flow, ArchiveError> {
        loop {
            if self.session.queue.is_empty() {
                self.warn("Download queue is empty")?;
                return Ok(Flow::Continue);
            }

            writeln!(self.out)?;
            self.info(&format!("Download Queue ({} items)", self.session.queue.len()))?;
            writeln!(self.out, "{}", &RULE[..50])?;
            for (i, item) in self.session.queue.items().iter().enumerate() {
                writeln!(self.out, "{:3}. {}", i + 1, item)?;
            }
            writeln!(self.out, "{}", &RULE[..50])?;
            writeln!(
                self.out,
                "Commands: 'r' - download all, 'c' - clear queue, 's' - save queue, 'b' - back"
            )?;

            let Some(choice) = self.prompt("Enter command:")? else {
                return Ok(Flow::Quit);
            };
            match choice.to_lowercase().as_str() {
                "c" => {
                    match self.session.queue.clear() {
                        Ok(()) => self.success("Queue cleared")?,
                        Err(e) => self.error(&format!("Could not clear queue: {e}"))?,
                    }
                    return Ok(Flow::Continue);
                }
                "s" => match self.session.queue.save() {
                    Ok(()) => self.success("Queue saved")?,
                    Err(e) => self.error(&format!("Could not save queue: {e}"))?,
                },
                "r" => {
                    let before = self.stats().clone();
                    let result = drain_queue(&mut self.session.downloader, self.session.queue.path());
                    if let Err(e) = self.session.queue.reload() {
                        log::warn!("Could not reload queue: {e}");
                    }
                    match result {
                        Ok(summary) => {
                            let after = self.stats();
                            let msg = format!(
                                "Queue processed: {} downloaded, {} skipped, {} failed",
                                after.downloaded_files - before.downloaded_files,
                                after.skipped_files - before.skipped_files,
                                summary.requeued.len()
                            );
                            self.success(&msg)?;
                        }
                        Err(e) => self.error(&format!("Error processing download queue: {e}"))?,
                    }
                    return Ok(Flow::Continue);
                }
                "b" | "back" => return Ok(Flow::Continue),
                "q" | "quit" | "exit" => return Ok(Flow::Quit),
                _ => self.error("Invalid command")?,
            }
        }
    }

    fn manage_filters(&mut self) -> Result<Flow, ArchiveError> {
        loop {
            writeln!(self.out)?;
            self.info("Filter Management")?;
            writeln!(self.out, "1. View current filters")?;
            writeln!(self.out, "2. Add new filter")?;
            writeln!(self.out, "3. Remove a filter")?;
            writeln!(self.out, "4. Back")?;

            let Some(choice) = self.prompt("Enter choice:")? else {
                return Ok(Flow::Quit);
            };
            match choice.as_str() {
                "1" => {
                    if self.session.filters.is_empty() {
                        self.warn("No active filters")?;
                    } else {
                        self.info("Current filters:")?;
                        for (i, pattern) in self.session.filters.patterns().iter().enumerate() {
                            writeln!(self.out, "{:2}. {}", i + 1, pattern)?;
                        }
                    }
                }
                "2" | "3" => {
                    let Some(text) = self.prompt("Enter filter text:")? else {
                        return Ok(Flow::Quit);
                    };
                    if text.trim().is_empty() {
                        self.error("Filter text cannot be empty")?;
                        continue;
                    }
                    let path = self.session.filter_path.clone();
                    let adding = choice == "2";
                    let result = if adding {
                        self.session.filters.add(&path, &text)
                    } else {
                        self.session.filters.remove(&path, &text)
                    };
                    match (adding, result) {
                        (true, Ok(true)) => self.success(&format!("Filter added: '{text}'"))?,
                        (true, Ok(false)) => self.warn("Filter already exists")?,
                        (false, Ok(true)) => self.success(&format!("Filter removed: '{text}'"))?,
                        (false, Ok(false)) => self.warn("No such filter")?,
                        (_, Err(e)) => self.error(&format!("Could not update filters: {e}"))?,
                    }
                }
                "4" | "b" | "back" => return Ok(Flow::Continue),
                _ => self.error("Invalid choice")?,
            }
        }
    }

    fn show_help(&mut self) -> Result<(), ArchiveError> {
        const HELP: &str = "\
Navigation:
  <number>     open a directory or select a file
  n, next      next page
  p, prev      previous page
  f, filter    show only entries containing some text
  b, back      go up one directory
  d, download  show the download queue
  h, help      show this help
  q, quit      leave the browser

File actions: show URL, copy it to the clipboard, add it to the
download queue or download it right away. Files that already exist
in the download directory are skipped.";
        writeln!(self.out)?;
        writeln!(self.out, "{HELP}")?;
        Ok(())
    }

    /// Print a prompt and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>, ArchiveError> {
        write!(self.out, "\n{} ", text.if_supports_color(Stdout, |t| t.cyan()))?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn info(&mut self, msg: &str) -> Result<(), ArchiveError> {
        writeln!(self.out, "{}", msg.if_supports_color(Stdout, |t| t.cyan()))?;
        Ok(())
    }

    fn success(&mut self, msg: &str) -> Result<(), ArchiveError> {
        writeln!(self.out, "{}", msg.if_supports_color(Stdout, |t| t.green()))?;
        Ok(())
    }

    fn warn(&mut self, msg: &str) -> Result<(), ArchiveError> {
        writeln!(self.out, "{}", msg.if_supports_color(Stdout, |t| t.yellow()))?;
        Ok(())
    }

    fn error(&mut self, msg: &str) -> Result<(), ArchiveError> {
        writeln!(self.out, "{}", msg.if_supports_color(Stdout, |t| t.red()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/browser_tests.rs"]
mod tests;
