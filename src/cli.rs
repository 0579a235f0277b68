use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Subtrail - turns completed agent subtasks into changelog files
#[derive(Parser, Debug)]
#[command(name = "subtrail")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ./subtrail.toml, then the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the tasks directory and write a changelog per completed subtask
    Watch {
        /// Tasks directory to watch (overrides watch.tasks_path)
        #[arg(long)]
        tasks: Option<PathBuf>,

        /// Changelog output directory (overrides output.changelog_dir)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print events as NDJSON
        #[arg(long)]
        json: bool,
    },

    /// Extract subtasks from one history file and print them as NDJSON
    Scan {
        /// Conversation history file
        file: PathBuf,

        /// Byte offset to start from
        #[arg(long, default_value_t = 0)]
        from: u64,
    },

    /// Print the effective configuration
    Config,
}
