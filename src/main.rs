use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use tokio::io::AsyncReadExt;

use rss_reader::config::FetchConfig;
use rss_reader::feed::{build_client, fetch_feed};

#[derive(Parser, Debug)]
#[command(name = "rss-reader", about = "Command-line RSS reader")]
struct Args {
    /// RSS URL (the feed is read from stdin when omitted)
    source: Option<String>,

    /// Print result as JSON in stdout
    #[arg(long)]
    json: bool,

    /// Limit news topics if this parameter provided
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Filter news topics by category
    #[arg(long, value_name = "CATEGORY")]
    category: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the feed
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let xml = match &args.source {
        Some(url) => {
            let config = FetchConfig::default();
            let client = build_client(&config).context("Failed to create HTTP client")?;
            fetch_feed(&client, url, &config)
                .await
                .with_context(|| format!("Failed to fetch feed from {}", url))?
        }
        None => {
            tracing::debug!("No source given, reading feed from stdin");
            let mut xml = String::new();
            tokio::io::stdin()
                .read_to_string(&mut xml)
                .await
                .context("Failed to read feed from stdin")?;
            xml
        }
    };

    let lines = rss_reader::rss_parser(&xml, args.limit, args.json, args.category.as_deref())
        .context("Failed to parse RSS feed")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", lines.join("\n")).context("Failed to write output")?;
    stdout.flush().context("Failed to write output")?;

    Ok(())
}
