mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use reviews_logging::reviews_error;

#[derive(Debug, Parser)]
#[command(name = "datashake-reviews")]
#[command(about = "Schedule Datashake review crawls and collect their results")]
struct Cli {
    /// Directory holding sources.json and reviews.json.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Also write log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Log debug records.
    #[arg(long, short)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Schedule new or delta crawls for every tracked source.
    Schedule,
    /// Refresh job statuses and merge the reviews of complete jobs.
    Collect,
    /// Print the status of one job as JSON.
    Status { job_id: String },
    /// Start tracking a review page URL.
    Add { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    reviews_logging::initialize(level, cli.log_file.as_deref());

    let result = match cli.command {
        Commands::Schedule => commands::schedule(&cli.data_dir).await,
        Commands::Collect => commands::collect(&cli.data_dir).await,
        Commands::Status { job_id } => commands::status(&job_id).await,
        Commands::Add { url } => commands::add(&cli.data_dir, &url),
    };
    if let Err(err) = &result {
        reviews_error!("{:#}", err);
    }
    result
}
