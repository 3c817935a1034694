use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "timebook")]
#[command(about = "Enter and review time bookings against projects and phases")]
pub struct Cli {
    /// Catalog file to use instead of the default config path
    #[arg(long, global = true, env = "TIMEBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize durations like "1.5h", "2:30" or "45m" to quarter-hour minutes
    Parse {
        #[arg(required = true)]
        inputs: Vec<String>,
    },
    /// Fuzzy search projects or phases
    Search {
        #[arg(value_enum)]
        kind: SearchKind,
        /// Search text; empty lists everything
        #[arg(default_value = "")]
        query: String,
        /// Only phases of this project (id or search text)
        #[arg(long)]
        project: Option<String>,
    },
    /// Validate a booking and print it
    Book {
        /// Project id or search text
        #[arg(long)]
        project: String,
        /// Phase id or search text
        #[arg(long)]
        phase: String,
        /// Duration, e.g. "1.5h", "90m", "1:30"
        #[arg(long)]
        duration: String,
        /// Booking date as YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Print the booking as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print config path and create default file if missing
    ConfigPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchKind {
    Projects,
    Phases,
}
