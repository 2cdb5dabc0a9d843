// ABOUTME: Key-value conversation store abstraction with pluggable backends
// ABOUTME: JSON blobs under namespaced keys with per-entry TTL (in-memory LRU or Redis)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Backend selection from configuration
pub mod factory;
/// In-memory LRU backend with TTL
pub mod memory;
/// Redis backend
pub mod redis;

pub use factory::Store;

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::StoreConfig;
use crate::constants::share::KEY_PREFIX;
use crate::errors::AppResult;

/// Key-value store trait for pluggable backend implementations
///
/// Operations are single best-effort attempts; callers decide how to surface
/// failures.
///
/// # Examples
///
/// ```rust,no_run
/// use pgchat_server::config::StoreConfig;
/// use pgchat_server::store::{memory::InMemoryStore, ConversationStore, StoreKey};
/// use std::time::Duration;
/// # async fn example() -> Result<(), pgchat_server::errors::AppError> {
/// let store = InMemoryStore::new(StoreConfig::in_memory()).await?;
/// let key = StoreKey::shared_chat("abc123");
///
/// store.set(&key, &vec!["hello"], Duration::from_secs(60)).await?;
/// let value: Option<Vec<String>> = store.get(&key).await?;
/// assert_eq!(value, Some(vec!["hello".to_owned()]));
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait ConversationStore: Send + Sync + Clone {
    /// Create new store instance with configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be initialized
    async fn new(config: StoreConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Store a JSON value with expiry
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &StoreKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>;

    /// Retrieve a JSON value, `None` if absent or expired
    ///
    /// # Errors
    ///
    /// Returns an error if the read or deserialization fails
    async fn get<T: DeserializeOwned + Send>(&self, key: &StoreKey) -> AppResult<Option<T>>;

    /// Check whether a live entry exists
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried
    async fn exists(&self, key: &StoreKey) -> AppResult<bool>;

    /// Remaining time to live, `None` if absent or without expiry
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried
    async fn ttl(&self, key: &StoreKey) -> AppResult<Option<Duration>>;

    /// Verify the backend is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unhealthy
    async fn health_check(&self) -> AppResult<()>;
}

/// Namespaced store key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    prefix: &'static str,
    id: String,
}

impl StoreKey {
    /// Key of a shared conversation: `chat:<id>`
    #[must_use]
    pub fn shared_chat(id: impl Into<String>) -> Self {
        Self {
            prefix: KEY_PREFIX,
            id: id.into(),
        }
    }

    /// Identifier part of the key
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_chat_key_format() {
        assert_eq!(StoreKey::shared_chat("a-b-c").to_string(), "chat:a-b-c");
    }
}
