//! Callsheet - financial narrative extraction for earnings call transcripts
//!
//! Reads a directory of transcripts and writes one JSON record per call.

use anyhow::{Context, Result};
use callsheet::batch;
use callsheet::config::Config;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing transcript files
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Process documents one at a time
    #[arg(long)]
    sequential: bool,

    /// Save the effective settings as the default config
    #[arg(long)]
    save_config: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };

    // Setup logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config.log_level.parse().unwrap_or(Level::INFO)
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("📞 Callsheet v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(input) = args.input {
        config.input_dir = input;
    }
    if let Some(output) = args.output {
        config.output_file = output;
    }
    if args.sequential {
        config.parallel = false;
    }
    if args.save_config {
        config.save().context("Failed to save config")?;
        info!("💾 Saved config to {}", callsheet::config::config_path().display());
    }

    let summary = batch::run(&config).with_context(|| {
        format!(
            "Failed to process transcripts in {}",
            config.input_dir.display()
        )
    })?;

    info!(
        "🏁 Done: {} transcript(s), {} metric values",
        summary.documents, summary.metrics_found
    );
    Ok(())
}
