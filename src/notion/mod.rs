//! Minimal typed client for the Notion REST API.
//!
//! - [`client`] - authenticated HTTP calls (query database, create page, archive page)
//! - [`types`] - request/response wire shapes
//! - [`error`] - [`NotionError`], distinguishing Notion's coded rejections from
//!   transport and decoding failures

mod client;
mod error;
pub mod types;

pub use client::NotionClient;
pub use error::NotionError;
pub use types::{Filter, Page, PropertyFilter, PropertyValue, QueryRequest, QueryResponse};
