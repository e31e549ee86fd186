use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use sports_feeds::config::Config;
use sports_feeds::feed::{apply_default_images, build_client, Aggregator, FeedItem};

/// Get the default config file path (~/.config/sports-feeds/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("sports-feeds")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(
    name = "sports-feeds",
    about = "Fetch, merge and rank the Mississippi Sports news feeds"
)]
struct Args {
    /// Config file (defaults to ~/.config/sports-feeds/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print items as a JSON array instead of text lines
    #[arg(long)]
    json: bool,

    /// Print at most N items
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Leave missing images empty instead of using the placeholder
    #[arg(long)]
    no_default_images: bool,

    /// Override the per-feed timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

fn write_text(out: &mut impl Write, items: &[FeedItem]) -> std::io::Result<()> {
    for item in items {
        writeln!(
            out,
            "{}  [{}]  {}",
            item.published_at.format("%Y-%m-%d %H:%M"),
            item.source,
            item.title
        )?;
        writeln!(out, "    {}", item.link)?;
        if let Some(image) = &item.image {
            writeln!(out, "    image: {}", image)?;
        }
        if !item.excerpt.is_empty() {
            writeln!(out, "    {}", item.excerpt)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let sources = config.sources();
    if sources.is_empty() {
        eprintln!("Warning: no feeds configured in {}", config_path.display());
    }

    let mut options = config.fetch_options();
    if let Some(ms) = args.timeout_ms {
        if ms == 0 {
            anyhow::bail!("--timeout-ms must be greater than zero");
        }
        options.timeout = Duration::from_millis(ms);
    }

    let client = build_client(&config.user_agent).context("Failed to build HTTP client")?;
    let aggregator = Aggregator::new(client, sources, options);

    let mut items = aggregator.collect().await;
    if !args.no_default_images {
        items = apply_default_images(items, &config.default_image);
    }
    if let Some(limit) = args.limit {
        items.truncate(limit);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &items).context("Failed to write JSON")?;
        writeln!(out)?;
    } else {
        write_text(&mut out, &items).context("Failed to write output")?;
    }

    Ok(())
}
