use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::notion::{NotionError, Page, PropertyValue};

// ============================================================================
// Feed Database Schema
// ============================================================================

/// Column names in the feeds database. Matched exactly by Notion.
pub const TITLE_PROPERTY: &str = "Title";
pub const LINK_PROPERTY: &str = "Link";
pub const ENABLED_PROPERTY: &str = "Enabled";
pub const CREATED_AT_PROPERTY: &str = "Created At";
pub const READ_PROPERTY: &str = "Read";

// ============================================================================
// Error Types
// ============================================================================

/// A row could not be projected into an [`RssFeed`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Property `{0}` is missing")]
    MissingProperty(&'static str),
    #[error("Property `{0}` has an unexpected type")]
    WrongType(&'static str),
    #[error("Title has no rich-text segments")]
    EmptyTitle,
    #[error("Link has no URL")]
    MissingUrl,
}

// ============================================================================
// Domain Types
// ============================================================================

/// An enabled feed subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RssFeed {
    pub title: String,
    pub url: String,
}

impl TryFrom<&Page> for RssFeed {
    type Error = ExtractionError;

    fn try_from(page: &Page) -> Result<Self, Self::Error> {
        let title = match page.properties.get(TITLE_PROPERTY) {
            Some(PropertyValue::Title { title }) => title
                .first()
                .map(|segment| segment.plain_text.clone())
                .ok_or(ExtractionError::EmptyTitle)?,
            Some(_) => return Err(ExtractionError::WrongType(TITLE_PROPERTY)),
            None => return Err(ExtractionError::MissingProperty(TITLE_PROPERTY)),
        };

        let url = match page.properties.get(LINK_PROPERTY) {
            Some(PropertyValue::Url { url }) => url.clone().ok_or(ExtractionError::MissingUrl)?,
            Some(_) => return Err(ExtractionError::WrongType(LINK_PROPERTY)),
            None => return Err(ExtractionError::MissingProperty(LINK_PROPERTY)),
        };

        Ok(Self { title, url })
    }
}

/// A new entry to append to the feeds database.
///
/// `content` holds Notion block objects and is sent unchanged as the page body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub content: Vec<Value>,
}

/// Outcome of a bulk archive.
///
/// Both lists are in completion order, not input order.
#[derive(Debug, Default)]
pub struct ArchiveReport {
    pub archived: Vec<String>,
    pub failed: Vec<(String, NotionError)>,
}

impl ArchiveReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
