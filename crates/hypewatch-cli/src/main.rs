mod analyze;
mod brands;
mod ingest;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::brands::BrandsCommands;
use crate::ingest::IngestCommands;

#[derive(Debug, Parser)]
#[command(name = "hypewatch")]
#[command(about = "Streetwear social intelligence command line interface")]
struct Cli {
    /// Brand roster YAML (defaults to HYPEWATCH_BRANDS_PATH)
    #[arg(long, global = true)]
    brands_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze the data directory and print a summary
    Analyze {
        /// Directory of scraped exports (defaults to HYPEWATCH_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Only count posts mentioning this brand (by slug)
        #[arg(long)]
        brand: Option<String>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a markdown intelligence report
    Report {
        /// Directory of scraped exports (defaults to HYPEWATCH_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Inspect the brand roster
    Brands {
        #[command(subcommand)]
        command: BrandsCommands,
    },
    /// Inspect scraped export files
    Ingest {
        #[command(subcommand)]
        command: IngestCommands,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = hypewatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let brands_path = cli
        .brands_file
        .unwrap_or_else(|| config.brands_path.clone());

    match cli.command {
        Some(Commands::Analyze {
            data_dir,
            brand,
            json,
        }) => {
            let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
            analyze::run_analyze(
                &config,
                &brands_path,
                &data_dir,
                brand.as_deref(),
                json,
            )?;
        }
        Some(Commands::Report { data_dir, output }) => {
            let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
            analyze::run_report(&config, &brands_path, &data_dir, output.as_deref())?;
        }
        Some(Commands::Brands { command }) => match command {
            BrandsCommands::List => brands::run_brands_list(&brands_path)?,
            BrandsCommands::Validate => brands::run_brands_validate(&brands_path)?,
        },
        Some(Commands::Ingest { command }) => match command {
            IngestCommands::Check { paths } => ingest::run_ingest_check(&paths)?,
        },
        None => println!("hypewatch: run with --help to list commands"),
    }

    Ok(())
}
