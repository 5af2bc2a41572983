//! game-shelf CLI
//!
//! Command-line front end for the game library, the metadata cache and the
//! ROM archive browser.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;

use clap::Parser;

use cli_types::{Cli, Commands, MetadataAction};
use commands::{AppContext, archive, config, failure, library, metadata};

pub(crate) use error::CliError;
pub(crate) use logging::log_blank;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{e}");
        std::process::exit(2);
    }

    let result = AppContext::load(cli.quiet).and_then(|ctx| run(&ctx, cli.command));
    log::logger().flush();
    if let Err(e) = result {
        failure(e);
        log::logger().flush();
        std::process::exit(1);
    }
}

fn run(ctx: &AppContext, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Browse { dataset, url } => archive::run_browse(ctx, dataset, url),
        Commands::Download {
            queue,
            platform,
            max_files,
            list_platforms,
            dataset,
            dir,
        } => archive::run_download(ctx, queue, platform, max_files, list_platforms, dataset, dir),
        Commands::Queue { action } => archive::run_queue(ctx, action),
        Commands::History { action } => archive::run_history(ctx, action),
        Commands::Filters { action } => archive::run_filters(ctx, action),
        Commands::Scan {
            dir,
            roms,
            emulator,
        } => library::run_scan(ctx, &dir, roms, emulator),
        Commands::Library { dir } => library::run_library(ctx, dir),
        Commands::Rate { name, value } => library::run_rate(ctx, &name, value),
        Commands::Unrate { name } => library::run_unrate(ctx, &name),
        Commands::Tag { action } => library::run_tag(ctx, action),
        Commands::Favorite { action } => library::run_favorite(ctx, action),
        Commands::Metadata { action } => match action {
            MetadataAction::Fetch {
                names,
                refresh,
                sources,
            } => metadata::run_fetch(ctx, names, refresh, sources),
            MetadataAction::Show { name } => metadata::run_show(ctx, &name),
            MetadataAction::List { query } => metadata::run_list(ctx, query.as_deref()),
            MetadataAction::Forget { name, all } => {
                metadata::run_forget(ctx, name.as_deref(), all)
            }
        },
        Commands::Config { action } => config::run_config(ctx, action),
        Commands::Credentials { action } => config::run_credentials(action),
    }
}
