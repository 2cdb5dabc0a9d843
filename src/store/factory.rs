// ABOUTME: Store factory for environment-based backend selection
// ABOUTME: Dispatches to Redis when a URL is configured, otherwise the in-memory LRU
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use super::memory::InMemoryStore;
use super::redis::RedisStore;
use super::{ConversationStore, StoreKey};
use crate::config::StoreConfig;
use crate::errors::AppResult;

/// Unified store interface over the configured backend
#[derive(Clone)]
pub enum Store {
    /// Process-local LRU with TTL
    Memory(InMemoryStore),
    /// Redis-compatible key-value service
    Redis(RedisStore),
}

impl Store {
    /// Create the backend named by the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis connection cannot be established
    pub async fn new(config: StoreConfig) -> AppResult<Self> {
        if config.redis_url.is_some() {
            info!("Initializing Redis conversation store");
            Ok(Self::Redis(RedisStore::new(config).await?))
        } else {
            info!(
                "Initializing in-memory conversation store (max entries: {})",
                config.max_entries
            );
            Ok(Self::Memory(InMemoryStore::new(config).await?))
        }
    }

    /// In-memory store without the sweep task
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature mirrors [`Store::new`]
    pub async fn in_memory() -> AppResult<Self> {
        Self::new(StoreConfig::in_memory()).await
    }

    /// Create store from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the backend fails to initialize
    pub async fn from_env() -> AppResult<Self> {
        Self::new(StoreConfig::from_env()?).await
    }

    /// Backend name for logs and readiness output
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Redis(_) => "redis",
        }
    }

    /// Store a JSON value with expiry
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &StoreKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        match self {
            Self::Memory(store) => store.set(key, value, ttl).await,
            Self::Redis(store) => store.set(key, value, ttl).await,
        }
    }

    /// Retrieve a JSON value
    ///
    /// # Errors
    ///
    /// Returns an error if the read or deserialization fails
    pub async fn get<T: DeserializeOwned + Send>(&self, key: &StoreKey) -> AppResult<Option<T>> {
        match self {
            Self::Memory(store) => store.get(key).await,
            Self::Redis(store) => store.get(key).await,
        }
    }

    /// Check if a live entry exists
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried
    pub async fn exists(&self, key: &StoreKey) -> AppResult<bool> {
        match self {
            Self::Memory(store) => store.exists(key).await,
            Self::Redis(store) => store.exists(key).await,
        }
    }

    /// Remaining time to live
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried
    pub async fn ttl(&self, key: &StoreKey) -> AppResult<Option<Duration>> {
        match self {
            Self::Memory(store) => store.ttl(key).await,
            Self::Redis(store) => store.ttl(key).await,
        }
    }

    /// Verify the backend is healthy
    ///
    /// # Errors
    ///
    /// Returns an error if the health check fails
    pub async fn health_check(&self) -> AppResult<()> {
        match self {
            Self::Memory(store) => store.health_check().await,
            Self::Redis(store) => store.health_check().await,
        }
    }
}
