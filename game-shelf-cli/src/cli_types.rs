//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use game_shelf_core::{Dataset, MetadataSource};

#[derive(Parser)]
#[command(name = "game-shelf")]
#[command(
    about = "Manage a local game collection and browse the ROM archive",
    long_about = None
)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Browse the ROM archive interactively
    Browse {
        /// Dataset to start in (redump or no-intro)
        #[arg(long)]
        dataset: Option<Dataset>,

        /// Open this listing URL directly
        #[arg(long)]
        url: Option<String>,
    },

    /// Download files without the interactive browser
    Download {
        /// Download everything in the queue file
        #[arg(long, conflicts_with = "platform")]
        queue: bool,

        /// Download a whole platform (menu number, abbreviation or name)
        #[arg(long)]
        platform: Option<String>,

        /// Stop after this many files of the platform
        #[arg(long, requires = "platform")]
        max_files: Option<usize>,

        /// Print the known platforms and exit
        #[arg(long)]
        list_platforms: bool,

        /// Dataset the platform belongs to (redump or no-intro)
        #[arg(long)]
        dataset: Option<Dataset>,

        /// Download directory (defaults to the configured one)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Inspect or edit the download queue
    Queue {
        #[command(subcommand)]
        action: QueueAction,
    },

    /// Inspect or clear the browse history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Manage exclude filters for archive listings
    Filters {
        #[command(subcommand)]
        action: FilterAction,
    },

    /// Scan an install folder for game executables, or a ROM folder
    Scan {
        /// Folder to scan
        dir: PathBuf,

        /// Treat the folder as a ROM tree grouped by system folder
        #[arg(long)]
        roms: bool,

        /// Emulator used to build launch commands for ROMs
        #[arg(long, requires = "roms")]
        emulator: Option<PathBuf>,
    },

    /// List the library built from the shortcuts folder
    Library {
        /// Shortcuts folder (defaults to library.shortcuts_dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Set a custom rating for a game
    Rate {
        name: String,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Remove a custom rating
    Unrate { name: String },

    /// Manage custom tags
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Manage favorites
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },

    /// Fetch and inspect game metadata from online catalogs
    Metadata {
        #[command(subcommand)]
        action: MetadataAction,
    },

    /// Show or edit settings.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show metadata catalog credentials and their sources
    Credentials {
        #[command(subcommand)]
        action: CredentialsAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum QueueAction {
    /// List queued URLs
    List,
    /// Add a URL to the queue
    Add { url: String },
    /// Empty the queue
    Clear,
}

#[derive(Subcommand)]
pub(crate) enum HistoryAction {
    /// List visited listings, most recent first
    List,
    /// Forget all visited listings
    Clear,
}

#[derive(Subcommand)]
pub(crate) enum FilterAction {
    /// List active filters
    List,
    /// Hide files whose name contains this text
    Add { text: String },
    /// Remove a filter
    Remove { text: String },
}

#[derive(Subcommand)]
pub(crate) enum TagAction {
    /// Replace a game's tags with a comma-separated list
    Set { name: String, tags: String },
    /// Add one tag
    Add { name: String, tag: String },
    /// Remove one tag
    Remove { name: String, tag: String },
    /// List a game's tags, or every tag in use
    List { name: Option<String> },
}

#[derive(Subcommand)]
pub(crate) enum FavoriteAction {
    Add { name: String },
    Remove { name: String },
    List,
}

#[derive(Subcommand)]
pub(crate) enum MetadataAction {
    /// Look up games in the catalogs and cache the results
    Fetch {
        #[arg(required = true)]
        names: Vec<String>,

        /// Query the catalogs even when a cached record exists
        #[arg(long)]
        refresh: bool,

        /// Only use these catalogs, in this order (e.g. steam,rawg,igdb)
        #[arg(long = "source", value_delimiter = ',')]
        sources: Vec<MetadataSource>,
    },
    /// Show the cached record for a game
    Show { name: String },
    /// List cached games, optionally only those matching a search
    List { query: Option<String> },
    /// Drop a cached record, or the whole cache with --all
    Forget {
        #[arg(required_unless_present = "all")]
        name: Option<String>,

        #[arg(long, conflicts_with = "name")]
        all: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Print the effective settings
    Show,
    /// Print the settings file path
    Path,
    /// Set one key, e.g. `archive.page_size 25`
    Set { key: String, value: String },
}

#[derive(Subcommand)]
pub(crate) enum CredentialsAction {
    /// Show each credential and where it comes from
    Show,
    /// Print the credentials file path
    Path,
}
