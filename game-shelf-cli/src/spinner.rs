//! Spinners and byte progress bars for long-running network steps.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use game_shelf_archive::DownloadEvent;

const TICK: Duration = Duration::from_millis(100);

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("/-\\|")
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "  {msg} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ")
}

/// A ticking spinner. Hidden when `quiet`.
pub(crate) fn spinner(msg: impl Into<String>, quiet: bool) -> ProgressBar {
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(spinner_style());
    pb.set_message(msg.into());
    pb.enable_steady_tick(TICK);
    pb
}

/// Observer for [`game_shelf_archive::Downloader`] that shows one progress
/// bar per transfer: a byte bar when the server sends a length, a spinner
/// otherwise.
pub(crate) fn download_observer(quiet: bool) -> impl FnMut(&DownloadEvent) + 'static {
    let mut current: Option<ProgressBar> = None;
    move |event| match event {
        DownloadEvent::Started {
            filename,
            content_length,
        } => {
            let pb = match content_length {
                Some(len) => {
                    let pb = ProgressBar::new(*len);
                    pb.set_style(bar_style());
                    pb
                }
                None => {
                    let pb = ProgressBar::new_spinner();
                    pb.set_style(spinner_style());
                    pb.enable_steady_tick(TICK);
                    pb
                }
            };
            if quiet {
                pb.set_draw_target(ProgressDrawTarget::hidden());
            }
            pb.set_message(filename.clone());
            current = Some(pb);
        }
        DownloadEvent::Progress { written } => {
            if let Some(pb) = &current {
                pb.set_position(*written);
            }
        }
        DownloadEvent::Finished { .. } => {
            if let Some(pb) = current.take() {
                pb.finish_and_clear();
            }
        }
    }
}
