//! Process configuration, read once from the environment at startup.
//!
//! [`NotionConfig`] carries the secret token and database identifiers and
//! fails fast when one is missing. [`Settings`] carries optional client tuning;
//! unset variables fall back to `Settings::default()`.
use secrecy::SecretString;
use std::num::{NonZeroU64, NonZeroUsize};
use std::str::FromStr;
use thiserror::Error;

pub const TOKEN_VAR: &str = "NOTION_API_TOKEN";
pub const READER_DATABASE_VAR: &str = "NOTION_READER_DATABASE_ID";
pub const FEEDS_DATABASE_VAR: &str = "NOTION_FEEDS_DATABASE_ID";
pub const CI_VAR: &str = "CI";

pub const BASE_URL_VAR: &str = "NOTION_API_BASE_URL";
pub const VERSION_VAR: &str = "NOTION_VERSION";
pub const TIMEOUT_VAR: &str = "NOTION_REQUEST_TIMEOUT_SECS";
pub const ARCHIVE_CONCURRENCY_VAR: &str = "NOTION_ARCHIVE_CONCURRENCY";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable `{0}` is required but not set.")]
    MissingVar(&'static str),

    #[error("Environment variable `{name}` must be a positive integer, got {value:?}")]
    InvalidVar { name: &'static str, value: String },
}

// ============================================================================
// Credentials and Database Identifiers
// ============================================================================

/// Verbosity the process logs at unless `RUST_LOG` says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    /// Filter directive for this crate. Dependencies stay at `warn`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "warn,notion_feeds=debug",
            LogLevel::Info => "warn,notion_feeds=info",
        }
    }
}

/// Identifiers and credentials for the Notion workspace.
///
/// Built once at startup and read-only afterwards. The token is a
/// [`SecretString`], so `Debug` output never contains it.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub token: SecretString,
    pub reader_database_id: String,
    pub feed_database_id: String,
    pub log_level: LogLevel,
}

impl NotionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Required variables are checked in order: token, reader database,
    /// feeds database. The first one missing is reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::MissingVar(key));

        let token = required(TOKEN_VAR)?;
        let reader_database_id = required(READER_DATABASE_VAR)?;
        let feed_database_id = required(FEEDS_DATABASE_VAR)?;

        // Presence alone counts, so `CI=` lowers verbosity too.
        let log_level = if lookup(CI_VAR).is_some() {
            LogLevel::Info
        } else {
            LogLevel::Debug
        };

        Ok(Self {
            token: SecretString::from(token),
            reader_database_id,
            feed_database_id,
            log_level,
        })
    }
}

// ============================================================================
// Client Settings
// ============================================================================

pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

const DEFAULT_TIMEOUT_SECS: NonZeroU64 = match NonZeroU64::new(30) {
    Some(secs) => secs,
    None => unreachable!(),
};

const DEFAULT_ARCHIVE_CONCURRENCY: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

/// Tuning for the Notion HTTP client.
///
/// Zero timeouts and zero concurrency are unrepresentable.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the Notion REST API.
    pub api_base_url: String,

    /// Value sent in the `Notion-Version` header.
    pub notion_version: String,

    /// Per-request timeout in seconds, covering the response body.
    pub request_timeout_secs: NonZeroU64,

    /// Maximum number of archive requests in flight at once.
    pub archive_concurrency: NonZeroUsize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            archive_concurrency: DEFAULT_ARCHIVE_CONCURRENCY,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// Unset or empty variables keep their defaults. Numeric variables must
    /// parse as positive integers.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let settings = Self {
            api_base_url: lookup(BASE_URL_VAR).unwrap_or(defaults.api_base_url),
            notion_version: lookup(VERSION_VAR).unwrap_or(defaults.notion_version),
            request_timeout_secs: match lookup(TIMEOUT_VAR) {
                Some(raw) => parse_positive(TIMEOUT_VAR, &raw)?,
                None => defaults.request_timeout_secs,
            },
            archive_concurrency: match lookup(ARCHIVE_CONCURRENCY_VAR) {
                Some(raw) => parse_positive(ARCHIVE_CONCURRENCY_VAR, &raw)?,
                None => defaults.archive_concurrency,
            },
        };

        if settings.api_base_url != DEFAULT_API_BASE_URL {
            tracing::info!(base_url = %settings.api_base_url, "Using custom Notion base URL");
        }
        Ok(settings)
    }
}

fn parse_positive<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
        name,
        value: raw.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const FULL: [(&str, &str); 3] = [
        (TOKEN_VAR, "secret_abc"),
        (READER_DATABASE_VAR, "reader-db"),
        (FEEDS_DATABASE_VAR, "feeds-db"),
    ];

    #[test]
    fn test_from_lookup_all_present() {
        let config = NotionConfig::from_lookup(lookup_from(&FULL)).unwrap();
        assert_eq!(config.token.expose_secret(), "secret_abc");
        assert_eq!(config.reader_database_id, "reader-db");
        assert_eq!(config.feed_database_id, "feeds-db");
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_ci_lowers_verbosity() {
        let mut pairs = FULL.to_vec();
        pairs.push((CI_VAR, "true"));
        let config = NotionConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_ci_presence_is_enough() {
        let mut pairs = FULL.to_vec();
        pairs.push((CI_VAR, ""));
        let config = NotionConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_each_missing_var_is_reported() {
        for missing in [TOKEN_VAR, READER_DATABASE_VAR, FEEDS_DATABASE_VAR] {
            let pairs: Vec<_> = FULL.iter().copied().filter(|(k, _)| *k != missing).collect();
            let err = NotionConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(err.to_string().contains(missing));
            assert_eq!(err, ConfigError::MissingVar(missing));
        }
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = NotionConfig::from_lookup(lookup_from(&FULL)).unwrap();
        let debug_output = format!("{:?}", config);
        assert!(
            !debug_output.contains("secret_abc"),
            "Debug output should not contain the token"
        );
        assert!(debug_output.contains("feeds-db"));
    }

    #[test]
    fn test_log_directives_scoped_to_crate() {
        for level in [LogLevel::Debug, LogLevel::Info] {
            let directive = level.as_directive();
            assert!(directive.starts_with("warn,"), "{directive}");
            assert!(directive.contains("notion_feeds="), "{directive}");
        }
    }

    #[test]
    fn test_settings_default_when_unset() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.notion_version, DEFAULT_NOTION_VERSION);
        assert_eq!(settings.request_timeout_secs.get(), 30);
        assert_eq!(settings.archive_concurrency.get(), 10);
    }

    #[test]
    fn test_settings_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "http://127.0.0.1:9000"),
            (VERSION_VAR, "2025-09-03"),
            (TIMEOUT_VAR, " 5 "),
            (ARCHIVE_CONCURRENCY_VAR, "3"),
        ]))
        .unwrap();
        assert_eq!(settings.api_base_url, "http://127.0.0.1:9000");
        assert_eq!(settings.notion_version, "2025-09-03");
        assert_eq!(settings.request_timeout_secs.get(), 5);
        assert_eq!(settings.archive_concurrency.get(), 3);
    }

    #[test]
    fn test_empty_setting_keeps_default() {
        let settings =
            Settings::from_lookup(lookup_from(&[(ARCHIVE_CONCURRENCY_VAR, "  ")])).unwrap();
        assert_eq!(settings.archive_concurrency.get(), 10);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err =
            Settings::from_lookup(lookup_from(&[(ARCHIVE_CONCURRENCY_VAR, "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidVar {
                name: ARCHIVE_CONCURRENCY_VAR,
                value: "0".to_string(),
            }
        );
    }

    #[test]
    fn test_zero_or_garbage_timeout_rejected() {
        for raw in ["0", "-1", "thirty"] {
            let err = Settings::from_lookup(lookup_from(&[(TIMEOUT_VAR, raw)])).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidVar { name: TIMEOUT_VAR, .. }),
                "{raw}: {err:?}"
            );
        }
    }
}
