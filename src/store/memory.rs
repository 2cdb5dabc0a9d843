// ABOUTME: In-memory store implementation with LRU eviction and TTL support
// ABOUTME: Includes background cleanup task for expired entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use super::{ConversationStore, StoreKey};
use crate::config::StoreConfig;
use crate::errors::AppResult;

#[derive(Debug, Clone)]
struct StoreEntry {
    data: Vec<u8>,
    expires_at: Instant,
}

impl StoreEntry {
    fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    fn remaining_ttl(&self) -> Option<Duration> {
        self.expires_at.checked_duration_since(Instant::now())
    }
}

type Entries = Arc<RwLock<LruCache<String, StoreEntry>>>;

/// In-memory store with LRU eviction and background cleanup
///
/// Expired entries are dropped lazily on read and, when enabled, by a periodic
/// sweep task that stops when the last handle is dropped.
#[derive(Clone)]
pub struct InMemoryStore {
    entries: Entries,
    shutdown_tx: Option<Arc<mpsc::Sender<()>>>,
}

impl InMemoryStore {
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    fn new_with_config(config: &StoreConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(Self::DEFAULT_CAPACITY);
        let entries: Entries = Arc::new(RwLock::new(LruCache::new(capacity)));

        let shutdown_tx = if config.enable_background_cleanup {
            let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
            let sweep_entries = Arc::clone(&entries);
            let cleanup_interval = config.cleanup_interval;

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(cleanup_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            Self::cleanup_expired(&sweep_entries).await;
                        }
                        _ = shutdown_rx.recv() => {
                            debug!("Store cleanup task received shutdown signal");
                            break;
                        }
                    }
                }
            });

            Some(Arc::new(shutdown_tx))
        } else {
            None
        };

        Self {
            entries,
            shutdown_tx,
        }
    }

    async fn cleanup_expired(entries: &Entries) {
        let mut guard = entries.write().await;
        let expired: Vec<String> = guard
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            guard.pop(key);
        }
        drop(guard);

        if !expired.is_empty() {
            debug!("Removed {} expired store entries", expired.len());
        }
    }

    /// Number of entries currently held, expired ones included until swept
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ConversationStore for InMemoryStore {
    async fn new(config: StoreConfig) -> AppResult<Self> {
        Ok(Self::new_with_config(&config))
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &StoreKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let entry = StoreEntry::new(serde_json::to_vec(value)?, ttl);
        self.entries.write().await.push(key.to_string(), entry);
        Ok(())
    }

    async fn get<T: DeserializeOwned + Send>(&self, key: &StoreKey) -> AppResult<Option<T>> {
        let key = key.to_string();
        let mut entries = self.entries.write().await;

        let data = match entries.get(&key) {
            Some(entry) if entry.is_expired() => {
                entries.pop(&key);
                None
            }
            Some(entry) => Some(entry.data.clone()),
            None => None,
        };
        drop(entries);

        match data {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn exists(&self, key: &StoreKey) -> AppResult<bool> {
        let key = key.to_string();
        let mut entries = self.entries.write().await;

        let live = match entries.peek(&key) {
            Some(entry) if entry.is_expired() => {
                entries.pop(&key);
                false
            }
            Some(_) => true,
            None => false,
        };
        drop(entries);
        Ok(live)
    }

    async fn ttl(&self, key: &StoreKey) -> AppResult<Option<Duration>> {
        let entries = self.entries.read().await;
        let ttl = entries
            .peek(&key.to_string())
            .filter(|entry| !entry.is_expired())
            .and_then(StoreEntry::remaining_ttl);
        drop(entries);
        Ok(ttl)
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

impl Drop for InMemoryStore {
    fn drop(&mut self) {
        // Only the last handle stops the sweep task
        if let Some(tx) = &self.shutdown_tx {
            if Arc::strong_count(tx) == 1 {
                if let Err(e) = tx.try_send(()) {
                    debug!(error = ?e, "Store shutdown signal send failed (channel likely closed)");
                }
            }
        }
    }
}
