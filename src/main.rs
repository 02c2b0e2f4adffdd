//! Sumi-Discussions main entry point
//!
//! This is the command-line interface for reading discussion comment ranges.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_discussions::config::load_optional_config;
use sumi_discussions::get_discussion_comments;
use sumi_discussions::output::{render_comments, write_output, OutputFormat};
use tracing_subscriber::EnvFilter;

/// Sumi-Discussions: a polite discussion thread reader
///
/// Fetches a range of comments from a paginated discussion thread and prints
/// them as JSON or markdown. Pages are requested with a courtesy delay.
#[derive(Parser, Debug)]
#[command(name = "sumi-discussions")]
#[command(version)]
#[command(about = "A polite discussion thread reader", long_about = None)]
struct Cli {
    /// URL of the discussion thread
    #[arg(value_name = "URL")]
    url: String,

    /// 0-based index of the first comment
    #[arg(short, long, default_value_t = 0)]
    start: usize,

    /// 0-based index of the last comment (defaults to the last comment of the thread)
    #[arg(short, long)]
    end: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_optional_config(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })?;

    let comments = match get_discussion_comments(&config, &cli.url, cli.start, cli.end).await {
        Ok(comments) => comments,
        Err(e) => {
            tracing::error!("Failed to fetch comments: {}", e);
            return Err(e.into());
        }
    };

    let rendered = render_comments(&comments, cli.format)?;
    write_output(&rendered, cli.output.as_deref())?;

    if let Some(path) = &cli.output {
        tracing::info!("Wrote {} comments to {}", comments.len(), path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout only carries the rendered comments.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_discussions=info,warn"),
            1 => EnvFilter::new("sumi_discussions=debug,info"),
            2 => EnvFilter::new("sumi_discussions=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
