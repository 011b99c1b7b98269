use super::error::NotionError;
use super::types::{
    CreatePageRequest, ErrorBody, Page, QueryRequest, QueryResponse, UpdatePageRequest,
};
use crate::config::Settings;
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Largest response body accepted from Notion.
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Minimal Notion REST client.
///
/// Cloning is cheap: the underlying `reqwest::Client` is reference counted.
#[derive(Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    token: SecretString,
    base_url: String,
    notion_version: String,
    timeout: Duration,
    max_response_bytes: usize,
}

impl NotionClient {
    /// Build a client for the API at `settings.api_base_url`.
    ///
    /// # Errors
    ///
    /// - [`NotionError::InvalidBaseUrl`] if the base URL does not parse
    /// - [`NotionError::InsecureBaseUrl`] if it is plain HTTP and not localhost
    pub fn new(token: SecretString, settings: &Settings) -> Result<Self, NotionError> {
        let base_url = checked_base_url(&settings.api_base_url)?;
        Ok(Self {
            http: reqwest::Client::new(),
            token,
            base_url,
            notion_version: settings.notion_version.clone(),
            timeout: Duration::from_secs(settings.request_timeout_secs.get()),
            max_response_bytes: MAX_RESPONSE_SIZE,
        })
    }

    /// `POST /databases/{id}/query`
    pub async fn query_database(
        &self,
        database_id: &str,
        query: &QueryRequest,
    ) -> Result<QueryResponse, NotionError> {
        let url = format!("{}/databases/{}/query", self.base_url, database_id);
        tracing::debug!(database_id, "Querying database");
        self.send(self.http.post(&url), query).await
    }

    /// `POST /pages`
    pub async fn create_page(&self, request: &CreatePageRequest<'_>) -> Result<Page, NotionError> {
        let url = format!("{}/pages", self.base_url);
        tracing::debug!(database_id = request.parent.database_id, "Creating page");
        self.send(self.http.post(&url), request).await
    }

    /// `PATCH /pages/{id}` with `archived: true`
    pub async fn archive_page(&self, page_id: &str) -> Result<Page, NotionError> {
        let url = format!("{}/pages/{}", self.base_url, page_id);
        tracing::debug!(page_id, "Archiving page");
        self.send(self.http.patch(&url), &UpdatePageRequest { archived: true })
            .await
    }

    async fn send<B, T>(
        &self,
        request: reqwest::RequestBuilder,
        body: &B,
    ) -> Result<T, NotionError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = request
            .bearer_auth(self.token.expose_secret())
            .header("Notion-Version", &self.notion_version)
            .json(body);

        // One deadline for the whole exchange, body included.
        let (status, bytes) = tokio::time::timeout(self.timeout, async {
            let response = request.send().await?;
            let status = response.status();
            let bytes = read_limited_bytes(response, self.max_response_bytes).await?;
            Ok::<_, NotionError>((status, bytes))
        })
        .await
        .map_err(|_| NotionError::Timeout(self.timeout.as_secs()))??;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &bytes));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, NotionError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if usize::try_from(len).map_or(true, |len| len > limit) {
            return Err(NotionError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(NotionError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

/// Decode Notion's error object, falling back to the bare status.
fn error_from_body(status: u16, body: &[u8]) -> NotionError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(err) => NotionError::Api {
            status: err.status,
            code: err.code,
            message: err.message,
        },
        Err(_) => NotionError::HttpStatus(status),
    }
}

/// The token is sent on every request, so only HTTPS is accepted.
/// Plain HTTP is allowed for localhost, which the tests rely on.
fn checked_base_url(raw: &str) -> Result<String, NotionError> {
    let parsed = Url::parse(raw)?;
    match parsed.scheme() {
        "https" => {}
        "http" if matches!(parsed.host_str(), Some("localhost") | Some("127.0.0.1")) => {
            tracing::warn!(base_url = %raw, "Using non-HTTPS Notion base URL (localhost only)");
        }
        _ => {
            tracing::error!(base_url = %raw, "Rejecting non-HTTPS base URL");
            return Err(NotionError::InsecureBaseUrl);
        }
    }
    Ok(raw.trim_end_matches('/').to_string())
}
