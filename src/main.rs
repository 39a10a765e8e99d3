use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use refsolve::config::{get_config, load_config};
use refsolve::models::{ResolutionReport, WireResponse};
use refsolve::providers::ResolverRegistry;
use refsolve::resolver::Mergeable;

#[derive(Parser)]
#[command(
    name = "refsolve",
    version,
    about = "Resolve citation metadata and summaries through prioritized provider chains"
)]
struct Cli {
    /// Use your own API key for this call instead of the configured pool
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Path to a TOML config file (environment variables otherwise)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve bibliographic metadata for a DOI
    Doi {
        /// The DOI to resolve (e.g. "10.1038/nature12373")
        doi: String,
    },

    /// Resolve book metadata for an ISBN
    Isbn {
        /// The ISBN-10 or ISBN-13 to resolve
        isbn: String,
    },

    /// Summarize a block of text
    Summarize {
        /// The text to summarize
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => get_config(),
    };
    let registry = ResolverRegistry::from_config(&config);
    let api_key = cli.api_key.as_deref();

    let outcome = match &cli.command {
        Command::Doi { doi } => print_report(registry.doi().resolve(doi, api_key).await)?,
        Command::Isbn { isbn } => print_report(registry.isbn().resolve(isbn, api_key).await)?,
        Command::Summarize { text } => {
            print_report(registry.summarize().resolve(text, api_key).await)?
        }
    };

    match outcome {
        Outcome::Resolved => Ok(()),
        // Ordinary exhaustion: the identifier was simply not found anywhere.
        Outcome::NotFound => std::process::exit(1),
        // No credentials at all: no resolution was possible in the first place.
        Outcome::Unconfigured => std::process::exit(2),
    }
}

enum Outcome {
    Resolved,
    NotFound,
    Unconfigured,
}

fn print_report<R: Mergeable + Serialize>(report: ResolutionReport<R>) -> Result<Outcome> {
    let outcome = if report.result.is_some() {
        Outcome::Resolved
    } else if report.failed_on_configuration() {
        Outcome::Unconfigured
    } else {
        Outcome::NotFound
    };

    let wire: WireResponse<R> = report.into_wire();
    println!("{}", serde_json::to_string_pretty(&wire)?);
    Ok(outcome)
}
