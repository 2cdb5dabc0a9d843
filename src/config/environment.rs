// ABOUTME: Environment-based server configuration for HTTP, upstream, shares, stream, and CORS
// ABOUTME: Reads variables (with optional .env file) into typed config structs with defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-only configuration
//!
//! Every setting has a default so a bare `pgchat-server` starts with the
//! in-memory store. Numeric values that fail to parse are configuration
//! errors rather than silent fallbacks.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use super::store::StoreConfig;
use crate::constants::{ports, protocol, share, upstream};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::DEFAULT_INSTRUCTIONS;
use crate::protocol::CitationMode;

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// HTTP bind host
    pub host: String,
    /// Upstream model provider settings
    pub upstream: UpstreamConfig,
    /// Key-value store settings
    pub store: StoreConfig,
    /// Shared conversation settings
    pub share: ShareConfig,
    /// Chat stream settings
    pub stream: StreamConfig,
    /// CORS settings
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: ports::DEFAULT_HTTP_PORT,
            host: ports::DEFAULT_HOST.to_owned(),
            upstream: UpstreamConfig::default(),
            store: StoreConfig::default(),
            share: ShareConfig::default(),
            stream: StreamConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unparseable or out-of-range value
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = Self {
            http_port: env_parse("HTTP_PORT", ports::DEFAULT_HTTP_PORT)?,
            host: env_var_or("HOST", ports::DEFAULT_HOST),
            upstream: UpstreamConfig::from_env()?,
            store: StoreConfig::from_env()?,
            share: ShareConfig::from_env()?,
            stream: StreamConfig::from_env()?,
            cors: CorsConfig::from_env(),
        };

        if config.upstream.api_key.is_empty() {
            warn!("OPENAI_API_KEY is not set; chat requests will be rejected upstream");
        }

        Ok(config)
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "PG Chat Server Configuration:\n\
             - Listen: {}:{}\n\
             - Model: {}\n\
             - Upstream: {}\n\
             - File Search: {}\n\
             - Store: {}\n\
             - Share TTL: {}s\n\
             - Citation Mode: {}\n\
             - CORS Origins: {}",
            self.host,
            self.http_port,
            self.upstream.model,
            self.upstream.base_url,
            if self.upstream.vector_store_ids.is_empty() {
                "Disabled".to_owned()
            } else {
                self.upstream.vector_store_ids.join(",")
            },
            if self.store.redis_url.is_some() {
                "Redis"
            } else {
                "In-memory"
            },
            self.share.ttl.as_secs(),
            self.stream.citation_mode,
            self.cors.allowed_origins.join(","),
        )
    }
}

/// Upstream model provider configuration
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Bearer credential
    pub api_key: String,
    /// API base URL without trailing slash
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Instructions used when the conversation carries no system turn
    pub default_instructions: String,
    /// Retrieval stores searched by the file-search tool; empty disables the tool
    pub vector_store_ids: Vec<String>,
    /// Optional cap on file-search results
    pub file_search_max_results: Option<u32>,
    /// Whether the provider keeps the response server-side
    pub store_responses: bool,
    /// Connect timeout; there is no overall timeout since streams can be long
    pub connect_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: upstream::DEFAULT_BASE_URL.to_owned(),
            model: upstream::DEFAULT_MODEL.to_owned(),
            default_instructions: DEFAULT_INSTRUCTIONS.to_owned(),
            vector_store_ids: Vec::new(),
            file_search_max_results: None,
            store_responses: true,
            connect_timeout: Duration::from_secs(upstream::DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl UpstreamConfig {
    /// Load upstream configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean variable cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        let file_search_max_results = match env_var_opt("FILE_SEARCH_MAX_RESULTS") {
            Some(raw) => Some(parse_value("FILE_SEARCH_MAX_RESULTS", &raw)?),
            None => None,
        };

        Ok(Self {
            api_key: env_var_or("OPENAI_API_KEY", ""),
            base_url: env_var_or("OPENAI_BASE_URL", upstream::DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_owned(),
            model: env_var_or("OPENAI_MODEL", upstream::DEFAULT_MODEL),
            default_instructions: env_var_or("CHAT_INSTRUCTIONS", DEFAULT_INSTRUCTIONS),
            vector_store_ids: parse_list(&env_var_or("OPENAI_VECTOR_STORE_IDS", "")),
            file_search_max_results,
            store_responses: env_parse("OPENAI_STORE_RESPONSES", true)?,
            connect_timeout: Duration::from_secs(env_parse(
                "UPSTREAM_CONNECT_TIMEOUT_SECS",
                upstream::DEFAULT_CONNECT_TIMEOUT_SECS,
            )?),
        })
    }
}

/// Shared conversation configuration
#[derive(Debug, Clone)]
pub struct ShareConfig {
    /// Snapshot retention
    pub ttl: Duration,
    /// Generated identifier length
    pub id_length: usize,
    /// Path prefix of returned share URLs
    pub path_prefix: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(share::TTL_SECS),
            id_length: share::DEFAULT_ID_LENGTH,
            path_prefix: share::DEFAULT_PATH_PREFIX.to_owned(),
        }
    }
}

impl ShareConfig {
    /// Load share configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if the TTL is unparseable or the identifier length is out of range
    pub fn from_env() -> AppResult<Self> {
        let id_length = env_parse("SHARE_ID_LENGTH", share::DEFAULT_ID_LENGTH)?;
        if !(share::MIN_ID_LENGTH..=share::MAX_ID_LENGTH).contains(&id_length) {
            return Err(AppError::config_invalid(format!(
                "SHARE_ID_LENGTH must be between {} and {}, got {id_length}",
                share::MIN_ID_LENGTH,
                share::MAX_ID_LENGTH
            )));
        }

        Ok(Self {
            ttl: Duration::from_secs(env_parse("SHARE_TTL_SECS", share::TTL_SECS)?),
            id_length,
            path_prefix: env_var_or("SHARE_PATH_PREFIX", share::DEFAULT_PATH_PREFIX)
                .trim_end_matches('/')
                .to_owned(),
        })
    }
}

/// Chat stream configuration
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    /// How citations are delivered to clients
    pub citation_mode: CitationMode,
}

impl StreamConfig {
    /// Load stream configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if `CITATION_MODE` is not `frame` or `suffix`
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            citation_mode: env_parse("CITATION_MODE", CitationMode::default())?,
        })
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins, `*` for any
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_owned()],
        }
    }
}

impl CorsConfig {
    /// Load CORS configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            allowed_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
        }
    }
}

/// Link template used by clients rendering citations
#[must_use]
pub fn citation_link_template() -> String {
    env_var_or(
        "CITATION_LINK_TEMPLATE",
        protocol::DEFAULT_CITATION_LINK_TEMPLATE,
    )
}

/// Get environment variable or default value
pub(crate) fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Get a non-blank environment variable
pub(crate) fn env_var_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an environment variable, falling back to `default` when unset
pub(crate) fn env_parse<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    env_var_opt(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::config_invalid(format!("Invalid {key} value '{raw}': {e}")))
}

/// Parse a comma-separated list, dropping blanks
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        parse_list(origins_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_drops_blanks() {
        assert_eq!(parse_list("vs_1, ,vs_2,"), vec!["vs_1", "vs_2"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, https://example.com"),
            vec!["http://localhost:3000", "https://example.com"]
        );
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("HTTP_PORT", "eighty").unwrap_err();
        assert!(err.message.contains("HTTP_PORT"));
    }
}
