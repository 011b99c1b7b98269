//! Request and response shapes for the subset of the Notion API this crate uses.
//!
//! Only the fields that are read or written are modelled; everything else in
//! Notion's payloads is ignored on decode.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// Query Filters
// ============================================================================

/// Compound database filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    Or(Vec<PropertyFilter>),
    And(Vec<PropertyFilter>),
}

/// A condition on a single database property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyFilter {
    pub property: String,
    #[serde(flatten)]
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Checkbox { equals: bool },
    Date { on_or_before: String },
}

impl PropertyFilter {
    pub fn checkbox(property: &str, equals: bool) -> Self {
        Self {
            property: property.to_string(),
            condition: Condition::Checkbox { equals },
        }
    }

    pub fn date_on_or_before(property: &str, timestamp: String) -> Self {
        Self {
            property: property.to_string(),
            condition: Condition::Date {
                on_or_before: timestamp,
            },
        }
    }
}

/// Body of `POST /databases/{id}/query`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub filter: Filter,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

// ============================================================================
// Pages and Property Values
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// A property value as returned on a page, tagged by its `type` field.
///
/// Property types this crate never reads decode as [`PropertyValue::Other`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        title: Vec<RichText>,
    },
    Url {
        url: Option<String>,
    },
    Checkbox {
        checkbox: bool,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RichText {
    pub plain_text: String,
}

// ============================================================================
// Page Creation
// ============================================================================

/// Body of `POST /pages`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePageRequest<'a> {
    pub parent: Parent<'a>,
    pub properties: BTreeMap<&'a str, PropertyInput<'a>>,
    /// Block objects, passed through as-is.
    pub children: &'a [Value],
}

#[derive(Debug, Clone, Serialize)]
pub struct Parent<'a> {
    pub database_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PropertyInput<'a> {
    Title { title: Vec<RichTextInput<'a>> },
    Url { url: &'a str },
}

impl<'a> PropertyInput<'a> {
    pub fn title(content: &'a str) -> Self {
        PropertyInput::Title {
            title: vec![RichTextInput {
                text: TextContent { content },
            }],
        }
    }

    pub fn url(url: &'a str) -> Self {
        PropertyInput::Url { url }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RichTextInput<'a> {
    pub text: TextContent<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextContent<'a> {
    pub content: &'a str,
}

/// Body of `PATCH /pages/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePageRequest {
    pub archived: bool,
}

/// Error object Notion returns with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub status: u16,
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_or_checkbox_filter_shape() {
        let request = QueryRequest {
            filter: Filter::Or(vec![PropertyFilter::checkbox("Enabled", true)]),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "filter": {
                    "or": [{ "property": "Enabled", "checkbox": { "equals": true } }]
                }
            })
        );
    }

    #[test]
    fn test_and_date_filter_shape() {
        let filter = Filter::And(vec![
            PropertyFilter::date_on_or_before("Created At", "2024-01-01T00:00:00.000Z".into()),
            PropertyFilter::checkbox("Read", false),
        ]);
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "and": [
                    { "property": "Created At", "date": { "on_or_before": "2024-01-01T00:00:00.000Z" } },
                    { "property": "Read", "checkbox": { "equals": false } }
                ]
            })
        );
    }

    #[test]
    fn test_page_properties_decode() {
        let page: Page = serde_json::from_value(json!({
            "object": "page",
            "id": "page-1",
            "archived": false,
            "properties": {
                "Title": {
                    "id": "title",
                    "type": "title",
                    "title": [{ "type": "text", "plain_text": "Rust Blog", "text": { "content": "Rust Blog" } }]
                },
                "Link": { "id": "abc", "type": "url", "url": "https://blog.rust-lang.org/feed.xml" },
                "Enabled": { "id": "def", "type": "checkbox", "checkbox": true },
                "Created At": { "id": "ghi", "type": "created_time", "created_time": "2024-01-01T00:00:00.000Z" }
            }
        }))
        .unwrap();

        assert_eq!(page.id, "page-1");
        assert_eq!(
            page.properties["Link"],
            PropertyValue::Url {
                url: Some("https://blog.rust-lang.org/feed.xml".into())
            }
        );
        assert_eq!(
            page.properties["Enabled"],
            PropertyValue::Checkbox { checkbox: true }
        );
        assert_eq!(page.properties["Created At"], PropertyValue::Other);
        match &page.properties["Title"] {
            PropertyValue::Title { title } => assert_eq!(title[0].plain_text, "Rust Blog"),
            other => panic!("Expected Title, got {:?}", other),
        }
    }

    #[test]
    fn test_null_url_decodes_as_none() {
        let value: PropertyValue =
            serde_json::from_value(json!({ "id": "x", "type": "url", "url": null })).unwrap();
        assert_eq!(value, PropertyValue::Url { url: None });
    }

    #[test]
    fn test_create_page_request_shape() {
        let children = vec![json!({ "object": "block", "type": "paragraph", "paragraph": {} })];
        let mut properties = BTreeMap::new();
        properties.insert("Title", PropertyInput::title("Hello"));
        properties.insert("Link", PropertyInput::url("https://example.com/post"));
        let request = CreatePageRequest {
            parent: Parent {
                database_id: "feeds-db",
            },
            properties,
            children: &children,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "parent": { "database_id": "feeds-db" },
                "properties": {
                    "Title": { "title": [{ "text": { "content": "Hello" } }] },
                    "Link": { "url": "https://example.com/post" }
                },
                "children": [{ "object": "block", "type": "paragraph", "paragraph": {} }]
            })
        );
    }
}
