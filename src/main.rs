//! Subtrail CLI
//!
//! Usage: subtrail <COMMAND>
//!
//! Commands:
//!   watch   Watch the tasks directory and write changelogs
//!   scan    Extract subtasks from a single history file
//!   config  Print the effective configuration

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use logging::Verbosity;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet));

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Watch {
            tasks,
            output,
            json,
        } => commands::watch::cmd_watch(config_path, tasks, output, json),
        Commands::Scan { file, from } => commands::scan::cmd_scan(config_path, &file, from),
        Commands::Config => commands::config::cmd_config(config_path),
    }
}
