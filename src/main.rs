use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use notion_feeds::config::{NotionConfig, Settings};
use notion_feeds::store::{report_error, FeedItem, FeedStore, ARCHIVE_AFTER_DAYS};

#[derive(Parser, Debug)]
#[command(name = "notion-feeds", about = "Maintain a Notion-backed feed reader")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print enabled feeds as `title<TAB>url`
    Feeds,
    /// Add a feed item to the feeds database
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        link: String,
        /// JSON file holding an array of Notion blocks for the page body
        #[arg(long, value_name = "FILE")]
        content: Option<PathBuf>,
    },
    /// Archive unread items older than 30 days
    Archive {
        /// Only print the IDs that would be archived
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    let config = NotionConfig::from_env()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.as_directive()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = Settings::from_env().context("Failed to load client settings")?;
    let store = FeedStore::new(config, &settings).context("Failed to create Notion client")?;

    match args.command {
        Command::Feeds => {
            let feeds = store.list_enabled_feeds().await.inspect_err(report_error)?;
            for feed in feeds {
                println!("{}\t{}", feed.title, feed.url);
            }
        }
        Command::Add {
            title,
            link,
            content,
        } => {
            let content = match content {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    serde_json::from_str(&raw).with_context(|| {
                        format!("{} is not a JSON array of blocks", path.display())
                    })?
                }
                None => Vec::new(),
            };
            let item = FeedItem {
                title,
                link,
                content,
            };
            let page_id = store.add_feed_item(&item).await.inspect_err(report_error)?;
            println!("{}", page_id);
        }
        Command::Archive { dry_run: true } => {
            let ids = store
                .old_unread_feed_item_ids(ARCHIVE_AFTER_DAYS)
                .await
                .inspect_err(report_error)?;
            for id in ids {
                println!("{}", id);
            }
        }
        Command::Archive { dry_run: false } => {
            let report = store
                .archive_unread_feed_items()
                .await
                .inspect_err(report_error)?;
            println!(
                "Archived {} items ({} failed)",
                report.archived.len(),
                report.failed.len()
            );
            if !report.is_complete() {
                anyhow::bail!("{} archive requests failed", report.failed.len());
            }
        }
    }

    Ok(())
}
