//! Console logger for the CLI.
//!
//! Info and debug records go to stdout and warnings and errors to stderr.
//! With `--logfile` every record is also appended to a file with color
//! codes stripped.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::CliError;

/// Target prefix of this workspace's crates. Other crates (reqwest,
/// rusqlite, ...) are held to warnings.
const OWN_TARGET: &str = "game_shelf";

pub(crate) struct CliLogger {
    level: LevelFilter,
    timestamps: bool,
    file: Option<Mutex<File>>,
}

/// Console level for the global flags. `--quiet` wins over `--verbose`.
pub(crate) fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

impl CliLogger {
    pub(crate) fn new(level: LevelFilter, timestamps: bool, file: Option<File>) -> Self {
        Self {
            level,
            timestamps,
            file: file.map(Mutex::new),
        }
    }

    fn limit_for(&self, target: &str) -> LevelFilter {
        if target.starts_with(OWN_TARGET) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        }
    }

    fn console_line(&self, record: &Record, message: &str) -> String {
        if self.timestamps {
            format!(
                "{} {:<5} {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                message
            )
        } else {
            message.to_string()
        }
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.limit_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        let line = self.console_line(record, &message);

        // A closed pipe must not take the process down.
        match record.level() {
            Level::Error | Level::Warn => {
                let _ = writeln!(std::io::stderr().lock(), "{line}");
            }
            _ => {
                let _ = writeln!(std::io::stdout().lock(), "{line}");
            }
        }

        if let Some(file) = &self.file
            && let Ok(mut f) = file.lock()
        {
            let _ = writeln!(
                f,
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                strip_ansi_escapes::strip_str(&message)
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        if let Some(file) = &self.file
            && let Ok(mut f) = file.lock()
        {
            let _ = f.flush();
        }
    }
}

/// Install the logger for the process.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let file = match logfile {
        Some(path) => Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| CliError::config(format!("cannot open {}: {e}", path.display())))?,
        ),
        None => None,
    };

    let level = level_for(quiet, verbose);
    log::set_boxed_logger(Box::new(CliLogger::new(level, verbose, file)))
        .map_err(|e| CliError::config(e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

/// Emit an empty info line.
pub(crate) fn log_blank() {
    log::info!("");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(level: Level, target: &str) -> Metadata<'_> {
        Metadata::builder().level(level).target(target).build()
    }

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(false, false), LevelFilter::Info);
        assert_eq!(level_for(false, true), LevelFilter::Debug);
        assert_eq!(level_for(true, true), LevelFilter::Warn);
    }

    #[test]
    fn test_foreign_targets_held_to_warnings() {
        let logger = CliLogger::new(LevelFilter::Debug, false, None);
        assert!(logger.enabled(&metadata(Level::Debug, "game_shelf_archive::download")));
        assert!(!logger.enabled(&metadata(Level::Info, "reqwest::connect")));
        assert!(logger.enabled(&metadata(Level::Warn, "reqwest::connect")));
    }

    #[test]
    fn test_quiet_hides_info() {
        let logger = CliLogger::new(level_for(true, false), false, None);
        assert!(!logger.enabled(&metadata(Level::Info, "game_shelf")));
        assert!(logger.enabled(&metadata(Level::Error, "game_shelf")));
    }

    #[test]
    fn test_logfile_is_plain_text() {
        use owo_colors::OwoColorize;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let file = File::create(&path).unwrap();
        let logger = CliLogger::new(LevelFilter::Info, false, Some(file));

        let colored = format!("{} done", "ok".green());
        logger.log(
            &Record::builder()
                .args(format_args!("{colored}"))
                .level(Level::Info)
                .target("game_shelf")
                .build(),
        );
        logger.flush();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("[INFO] ok done\n"), "{written:?}");
        assert!(!written.contains('\u{1b}'));
    }
}
