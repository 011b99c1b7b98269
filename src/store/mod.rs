//! Feed subscriptions and feed items kept in a Notion database.
//!
//! [`FeedStore`] turns domain operations into Notion queries and mutations:
//!
//! - [`FeedStore::list_enabled_feeds`] - subscriptions with `Enabled` checked
//! - [`FeedStore::add_feed_item`] - append a new item as a page
//! - [`FeedStore::archive_unread_feed_items`] - archive unread items older than 30 days
//! - [`FeedStore::archive_pages`] - bulk archive by page ID
//!
//! Remote failures are returned to the caller. Callers that only want to log
//! and carry on pass the error to [`report_error`].

mod archive;
mod feeds;
mod types;

pub use archive::{unread_cutoff, ARCHIVE_AFTER_DAYS};
pub use types::{
    ArchiveReport, ExtractionError, FeedItem, RssFeed, CREATED_AT_PROPERTY, ENABLED_PROPERTY,
    LINK_PROPERTY, READ_PROPERTY, TITLE_PROPERTY,
};

use crate::config::{NotionConfig, Settings};
use crate::notion::{NotionClient, NotionError};
use std::num::NonZeroUsize;

#[derive(Clone)]
pub struct FeedStore {
    client: NotionClient,
    config: NotionConfig,
    archive_concurrency: NonZeroUsize,
}

impl FeedStore {
    /// Build a store and its Notion client.
    ///
    /// # Errors
    ///
    /// Fails if `settings.api_base_url` is unparseable or not HTTPS
    /// (see [`NotionClient::new`]).
    pub fn new(config: NotionConfig, settings: &Settings) -> Result<Self, NotionError> {
        let client = NotionClient::new(config.token.clone(), settings)?;
        Ok(Self::with_client(client, config, settings.archive_concurrency))
    }

    pub fn with_client(
        client: NotionClient,
        config: NotionConfig,
        archive_concurrency: NonZeroUsize,
    ) -> Self {
        Self {
            client,
            config,
            archive_concurrency,
        }
    }

    pub fn config(&self) -> &NotionConfig {
        &self.config
    }
}

/// Log a failed Notion call as a single error event.
///
/// Coded rejections log Notion's error code; anything else logs the raw error.
/// Purely diagnostic: no retry, no change in control flow.
pub fn report_error(error: &NotionError) {
    match error {
        NotionError::Api {
            status,
            code,
            message,
        } => {
            tracing::error!(
                code = %code,
                status = status,
                message = %message,
                "Notion rejected request"
            );
        }
        other => {
            tracing::error!(error = %other, "Notion request failed");
        }
    }
}
