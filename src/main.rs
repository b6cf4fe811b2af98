use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use podcast_enclosures::config::Config;
use podcast_enclosures::feed::{self, FeedSource};

#[derive(Parser, Debug)]
#[command(
    name = "podcast-enclosures",
    about = "Print a podcast feed's episode GUID to enclosure map as JSON"
)]
struct Args {
    /// Feed file path or http(s) URL
    #[arg(value_name = "SOURCE")]
    source: String,

    /// Config file (default: ~/.config/podcast-enclosures/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print only GUID -> enclosure URL
    #[arg(long)]
    urls_only: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::default(),
    };

    let client = feed::build_client(&config).context("Failed to build HTTP client")?;

    let source = FeedSource::detect(&args.source);
    let document = source
        .load(&client)
        .with_context(|| format!("Failed to load feed from {}", source))?;

    let extraction = feed::extract(&document);
    tracing::info!(
        source = %source,
        episodes = extraction.resources.len(),
        skipped = extraction.skipped,
        invalid_lengths = extraction.invalid_lengths,
        "Extracted enclosures"
    );

    let pretty = args.pretty || config.pretty;
    let json = if args.urls_only {
        to_json(&feed::enclosure_urls(&extraction.resources), pretty)?
    } else {
        to_json(&extraction.resources, pretty)?
    };
    println!("{}", json);

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize output")
}
