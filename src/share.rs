// ABOUTME: Shared conversation service: message validation, identifier generation, persistence
// ABOUTME: Snapshots are stored under chat:<id> with a retention TTL and read back by id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Conversation Sharing
//!
//! A share request is validated loosely typed (the body is arbitrary JSON),
//! so each failure mode maps to its own client-facing message:
//!
//! | Problem | Message |
//! |---|---|
//! | `messages` missing or not an array | `Invalid messages format` |
//! | element with another role or non-string content | `Invalid message format` |
//! | empty array | `No messages to share` |

use chrono::Utc;
use rand::Rng;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::ShareConfig;
use crate::constants::share::{ID_ALPHABET, MAX_ID_ATTEMPTS};
use crate::errors::{AppError, AppResult};
use crate::models::{Role, ShareResponse, SharedConversation, Turn};
use crate::store::{Store, StoreKey};

/// Client-facing message for any persistence failure
pub const SHARE_FAILED: &str = "Failed to share chat";

/// Validate a share request body and extract its turns
///
/// # Errors
///
/// Returns an invalid-input error naming the first problem found
pub fn validate_messages(body: &Value) -> AppResult<Vec<Turn>> {
    let messages = body
        .get("messages")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::invalid_input("Invalid messages format"))?;

    let turns = messages
        .iter()
        .map(validate_turn)
        .collect::<Option<Vec<Turn>>>()
        .ok_or_else(|| AppError::invalid_input("Invalid message format"))?;

    if turns.is_empty() {
        return Err(AppError::invalid_input("No messages to share"));
    }
    Ok(turns)
}

fn validate_turn(message: &Value) -> Option<Turn> {
    let role = message
        .get("role")
        .and_then(Value::as_str)
        .and_then(Role::parse)
        .filter(|role| role.is_shareable())?;
    let content = message.get("content").and_then(Value::as_str)?;
    Some(Turn {
        role,
        content: content.to_owned(),
    })
}

/// Generate a share identifier drawn uniformly from `[a-z0-9-]`
///
/// Uses the thread-local CSPRNG; 16 characters give roughly 83 bits of entropy.
#[must_use]
pub fn generate_share_id(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect()
}

/// Creates and reads shared conversation snapshots
#[derive(Clone)]
pub struct ShareService {
    store: Store,
    config: ShareConfig,
}

impl ShareService {
    /// Create a service over a store
    #[must_use]
    pub const fn new(store: Store, config: ShareConfig) -> Self {
        Self { store, config }
    }

    /// Persist a snapshot and return its identifier and URL
    ///
    /// Identifiers are checked against the store and regenerated on collision
    /// a bounded number of times. The write itself is a single attempt.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for an empty list, or a storage error
    /// carrying [`SHARE_FAILED`] when the store cannot be used
    pub async fn create(&self, messages: Vec<Turn>) -> AppResult<ShareResponse> {
        if messages.is_empty() {
            return Err(AppError::invalid_input("No messages to share"));
        }

        let id_length = self.config.id_length;
        let id = self.unused_id(|| generate_share_id(id_length)).await?;
        let snapshot = SharedConversation {
            id: id.clone(),
            messages,
            created_at: Utc::now(),
        };

        self.store
            .set(&StoreKey::shared_chat(&id), &snapshot, self.config.ttl)
            .await
            .map_err(|e| {
                error!(share_id = %id, error = %e, "Failed to persist shared conversation");
                AppError::storage(SHARE_FAILED)
            })?;

        info!(share_id = %id, turns = snapshot.messages.len(), "Conversation shared");
        Ok(ShareResponse {
            url: format!("{}/{id}", self.config.path_prefix),
            id,
        })
    }

    /// Load a snapshot; `None` when unknown or expired
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn get(&self, id: &str) -> AppResult<Option<SharedConversation>> {
        self.store.get(&StoreKey::shared_chat(id)).await
    }

    async fn unused_id<F>(&self, mut next_id: F) -> AppResult<String>
    where
        F: FnMut() -> String + Send,
    {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = next_id();
            let taken = self
                .store
                .exists(&StoreKey::shared_chat(&id))
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to check share identifier");
                    AppError::storage(SHARE_FAILED)
                })?;
            if !taken {
                return Ok(id);
            }
            warn!(attempt, "Share identifier collision, regenerating");
        }
        Err(AppError::internal(SHARE_FAILED))
    }
}
