//! Feed subscriptions and feed items stored in Notion databases.
//!
//! ```ignore
//! use notion_feeds::config::{NotionConfig, Settings};
//! use notion_feeds::store::{report_error, FeedStore};
//!
//! let store = FeedStore::new(NotionConfig::from_env()?, &Settings::from_env()?)?;
//! let feeds = store.list_enabled_feeds().await.unwrap_or_else(|e| {
//!     report_error(&e);
//!     Vec::new()
//! });
//! ```

pub mod config;
pub mod notion;
pub mod store;
