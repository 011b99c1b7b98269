use std::collections::BTreeMap;

use super::types::{FeedItem, RssFeed, ENABLED_PROPERTY, LINK_PROPERTY, TITLE_PROPERTY};
use super::FeedStore;
use crate::notion::types::{CreatePageRequest, Parent, PropertyInput};
use crate::notion::{Filter, NotionError, PropertyFilter, QueryRequest};

impl FeedStore {
    // ========================================================================
    // Feed Subscriptions
    // ========================================================================

    /// Subscriptions whose `Enabled` checkbox is ticked.
    ///
    /// Rows that cannot be projected (empty title, missing link, ...) are
    /// skipped with a warning; the remaining rows are still returned.
    /// Only the first page of results is read.
    pub async fn list_enabled_feeds(&self) -> Result<Vec<RssFeed>, NotionError> {
        // A single-condition OR leaves room for more enabling conditions.
        let query = QueryRequest {
            filter: Filter::Or(vec![PropertyFilter::checkbox(ENABLED_PROPERTY, true)]),
        };
        let response = self
            .client
            .query_database(&self.config.feed_database_id, &query)
            .await?;

        if response.has_more {
            tracing::warn!(
                returned = response.results.len(),
                "More enabled feeds exist than one page holds; the rest are ignored"
            );
        }

        let mut feeds = Vec::with_capacity(response.results.len());
        for page in &response.results {
            match RssFeed::try_from(page) {
                Ok(feed) => feeds.push(feed),
                Err(e) => {
                    tracing::warn!(page_id = %page.id, error = %e, "Skipping malformed feed row");
                }
            }
        }

        tracing::debug!(count = feeds.len(), "Loaded enabled feeds");
        Ok(feeds)
    }

    // ========================================================================
    // Feed Items
    // ========================================================================

    /// Create a page for `item` in the feeds database and return its ID.
    pub async fn add_feed_item(&self, item: &FeedItem) -> Result<String, NotionError> {
        let mut properties = BTreeMap::new();
        properties.insert(TITLE_PROPERTY, PropertyInput::title(&item.title));
        properties.insert(LINK_PROPERTY, PropertyInput::url(&item.link));

        let request = CreatePageRequest {
            parent: Parent {
                database_id: &self.config.feed_database_id,
            },
            properties,
            children: &item.content,
        };

        let page = self.client.create_page(&request).await?;
        tracing::info!(page_id = %page.id, link = %item.link, "Added feed item");
        Ok(page.id)
    }
}
