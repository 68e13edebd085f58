//! Offline companions to the drug registry server.
//!
//! `drug-tools schema` prints the table DDL (optionally with sample INSERTs) for
//! provisioning a database by hand. `drug-tools stats` summarizes a JSON array of
//! drug records, defaulting to the built-in sample set.

mod schema;
mod stats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("input must be a JSON array of drug records")]
    NotAnArray,
    #[error("invalid id pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Parser)]
#[command(name = "drug-tools", version, about = "Drug registry schema and data tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the schema DDL.
    Schema {
        /// Append INSERT statements for the sample drugs.
        #[arg(long)]
        with_seed: bool,
    },
    /// Report category counts, common side effects and contraindications, and record validity.
    Stats {
        /// JSON file holding an array of drug records.
        #[arg(long, short)]
        input: Option<PathBuf>,
        /// Emit the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn run(cli: Cli) -> Result<(), ToolError> {
    match cli.command {
        Command::Schema { with_seed } => {
            print!("{}", schema::render(with_seed)?);
        }
        Command::Stats { input, json } => {
            let records = stats::load_records(input.as_deref())?;
            tracing::debug!(count = records.len(), "records loaded");
            let report = stats::report(&records)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", stats::render_text(&report));
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("drug_tools=info")))
        .init();
    run(Cli::parse())?;
    Ok(())
}
