use thiserror::Error;

/// Errors returned by [`NotionClient`](super::NotionClient).
///
/// `Api` is a rejection Notion described with its own error object and a
/// machine-readable code. Every other variant is a transport or decoding
/// failure with no code attached.
#[derive(Debug, Error)]
pub enum NotionError {
    /// Notion answered with an error object (`validation_error`, `rate_limited`, ...)
    #[error("Notion API error (status {status}, code {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    /// Non-2xx response whose body was not a Notion error object
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// 2xx response whose body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
}

impl NotionError {
    /// Machine-readable Notion error code, when the service supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            NotionError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            NotionError::Api { status, .. } | NotionError::HttpStatus(status) => Some(*status),
            _ => None,
        }
    }
}
