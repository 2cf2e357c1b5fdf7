//! Theme graph CLI.
//!
//! Parses arguments, initializes logging and dispatches to a command.

use clap::Parser;
use miette::Result;
use theme_graph_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors();

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args).await,
        cli::Command::DeadLinks(dead_links_args) => {
            commands::dead_links_execute(dead_links_args).await
        }
        cli::Command::Watch(watch_args) => commands::watch_execute(watch_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
