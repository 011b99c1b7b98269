use chrono::{DateTime, Duration, SecondsFormat, Utc};
use futures::stream::{self, StreamExt};

use super::types::{ArchiveReport, CREATED_AT_PROPERTY, READ_PROPERTY};
use super::FeedStore;
use crate::notion::{Filter, NotionError, PropertyFilter, QueryRequest};

/// Unread items older than this many days are archived.
pub const ARCHIVE_AFTER_DAYS: u32 = 30;

/// The instant `days` days before `now`.
///
/// Saturates at the earliest representable instant when `days` reaches past it.
pub fn unread_cutoff(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(days))
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl FeedStore {
    /// Archive every unread item created more than [`ARCHIVE_AFTER_DAYS`] days ago.
    ///
    /// A failed lookup is returned as `Err`; failures of individual archive
    /// calls are collected in the report.
    pub async fn archive_unread_feed_items(&self) -> Result<ArchiveReport, NotionError> {
        let ids = self.old_unread_feed_item_ids(ARCHIVE_AFTER_DAYS).await?;
        if ids.is_empty() {
            tracing::info!("No stale unread feed items to archive");
            return Ok(ArchiveReport::default());
        }

        let report = self.archive_pages(&ids).await;
        tracing::info!(
            archived = report.archived.len(),
            failed = report.failed.len(),
            "Archived stale unread feed items"
        );
        Ok(report)
    }

    /// IDs of unread items created at least `days` days ago.
    pub async fn old_unread_feed_item_ids(&self, days: u32) -> Result<Vec<String>, NotionError> {
        self.old_unread_feed_item_ids_as_of(days, Utc::now()).await
    }

    /// Same as [`old_unread_feed_item_ids`](Self::old_unread_feed_item_ids),
    /// measuring `days` back from `now` instead of the wall clock.
    pub async fn old_unread_feed_item_ids_as_of(
        &self,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, NotionError> {
        let cutoff = unread_cutoff(now, days).to_rfc3339_opts(SecondsFormat::Millis, true);
        let query = QueryRequest {
            filter: Filter::And(vec![
                PropertyFilter::date_on_or_before(CREATED_AT_PROPERTY, cutoff.clone()),
                PropertyFilter::checkbox(READ_PROPERTY, false),
            ]),
        };

        let response = self
            .client
            .query_database(&self.config.feed_database_id, &query)
            .await?;

        if response.has_more {
            tracing::warn!(
                returned = response.results.len(),
                "More stale items exist than one page holds; the rest wait for the next run"
            );
        }

        tracing::debug!(%cutoff, count = response.results.len(), "Found stale unread items");
        Ok(response.results.into_iter().map(|page| page.id).collect())
    }

    /// Archive each page independently.
    ///
    /// Requests run concurrently and complete in any order. A failure does
    /// not stop the others; it is logged and recorded in the report.
    pub async fn archive_pages(&self, ids: &[String]) -> ArchiveReport {
        let outcomes: Vec<(String, Result<(), NotionError>)> = stream::iter(ids.iter().cloned())
            .map(|id| async move {
                let result = self.client.archive_page(&id).await.map(|_| ());
                (id, result)
            })
            .buffer_unordered(self.archive_concurrency.get())
            .collect()
            .await;

        let mut report = ArchiveReport::default();
        for (id, result) in outcomes {
            match result {
                Ok(()) => report.archived.push(id),
                Err(e) => {
                    tracing::warn!(page_id = %id, error = %e, "Failed to archive page");
                    report.failed.push((id, e));
                }
            }
        }
        report
    }
}
