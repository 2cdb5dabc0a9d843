// ABOUTME: Key-value store configuration for the in-memory and Redis backends
// ABOUTME: Handles backend selection, LRU capacity, cleanup cadence, and Redis retry tuning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::environment::{env_parse, env_var_opt};
use crate::constants::store::{self, redis};
use crate::errors::AppResult;

/// Store configuration shared by every backend
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Redis URL; when absent the in-memory backend is used
    pub redis_url: Option<String>,
    /// Maximum number of entries in the in-memory backend
    pub max_entries: usize,
    /// Interval between expired-entry sweeps
    pub cleanup_interval: Duration,
    /// Whether the in-memory backend spawns its sweep task
    pub enable_background_cleanup: bool,
    /// Redis connection configuration
    pub redis_connection: RedisConnectionConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            max_entries: store::DEFAULT_MAX_ENTRIES,
            cleanup_interval: Duration::from_secs(store::DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::default(),
        }
    }
}

impl StoreConfig {
    /// In-memory configuration without the sweep task, for tests and tools
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            enable_background_cleanup: false,
            ..Self::default()
        }
    }

    /// Load store configuration from environment
    ///
    /// `REDIS_URL` wins over `KV_URL` (the managed store's variable).
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            redis_url: env_var_opt("REDIS_URL").or_else(|| env_var_opt("KV_URL")),
            max_entries: env_parse("STORE_MAX_ENTRIES", store::DEFAULT_MAX_ENTRIES)?,
            cleanup_interval: Duration::from_secs(env_parse(
                "STORE_CLEANUP_INTERVAL_SECS",
                store::DEFAULT_CLEANUP_INTERVAL_SECS,
            )?),
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::from_env()?,
        })
    }
}

/// Redis connection and retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConnectionConfig {
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
    /// Response/command timeout in seconds
    pub response_timeout_secs: u64,
    /// Number of reconnection retries after connection drop
    pub reconnection_retries: usize,
    /// Exponential backoff base for retry delays
    pub retry_exponent_base: u64,
    /// Maximum retry delay in milliseconds
    pub max_retry_delay_ms: u64,
    /// Number of retries for initial connection at startup
    pub initial_connection_retries: u32,
    /// Initial retry delay in milliseconds (doubles with exponential backoff)
    pub initial_retry_delay_ms: u64,
}

impl Default for RedisConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: redis::CONNECTION_TIMEOUT_SECS,
            response_timeout_secs: redis::RESPONSE_TIMEOUT_SECS,
            reconnection_retries: redis::RECONNECTION_RETRIES,
            retry_exponent_base: redis::RETRY_EXPONENT_BASE,
            max_retry_delay_ms: redis::MAX_RETRY_DELAY_MS,
            initial_connection_retries: redis::INITIAL_CONNECTION_RETRIES,
            initial_retry_delay_ms: redis::INITIAL_RETRY_DELAY_MS,
        }
    }
}

impl RedisConnectionConfig {
    /// Load Redis connection configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            connection_timeout_secs: env_parse(
                "REDIS_CONNECTION_TIMEOUT_SECS",
                redis::CONNECTION_TIMEOUT_SECS,
            )?,
            response_timeout_secs: env_parse(
                "REDIS_RESPONSE_TIMEOUT_SECS",
                redis::RESPONSE_TIMEOUT_SECS,
            )?,
            reconnection_retries: env_parse(
                "REDIS_RECONNECTION_RETRIES",
                redis::RECONNECTION_RETRIES,
            )?,
            retry_exponent_base: env_parse(
                "REDIS_RETRY_EXPONENT_BASE",
                redis::RETRY_EXPONENT_BASE,
            )?,
            max_retry_delay_ms: env_parse("REDIS_MAX_RETRY_DELAY_MS", redis::MAX_RETRY_DELAY_MS)?,
            initial_connection_retries: env_parse(
                "REDIS_INITIAL_CONNECTION_RETRIES",
                redis::INITIAL_CONNECTION_RETRIES,
            )?,
            initial_retry_delay_ms: env_parse(
                "REDIS_INITIAL_RETRY_DELAY_MS",
                redis::INITIAL_RETRY_DELAY_MS,
            )?,
        })
    }
}
