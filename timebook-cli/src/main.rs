mod cli;
mod commands;
mod config;

use anyhow::{bail, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::TimebookConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Parse { inputs } => {
            let (report, all_bookable) = commands::parse_report(&inputs);
            print!("{report}");
            if !all_bookable {
                bail!("Some durations cannot be booked");
            }
        }
        Commands::Search {
            kind,
            query,
            project,
        } => {
            let catalog = TimebookConfig::load(cli.config.as_deref())?.catalog()?;
            print!(
                "{}",
                commands::search_report(&catalog, kind, &query, project.as_deref())?
            );
        }
        Commands::Book {
            project,
            phase,
            duration,
            date,
            json,
        } => {
            let catalog = TimebookConfig::load(cli.config.as_deref())?.catalog()?;
            let date = commands::booking_date(date.as_deref())?;
            println!(
                "{}",
                commands::book_report(&catalog, &project, &phase, &duration, date, json)?
            );
        }
        Commands::ConfigPath => {
            let path = match cli.config {
                Some(path) => path,
                None => TimebookConfig::config_path()?,
            };
            if !path.exists() {
                TimebookConfig::default().save(&path)?;
                println!("Created default config at {}", path.display());
            } else {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
