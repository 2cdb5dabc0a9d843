// ABOUTME: Redis store implementation with managed reconnection and TTL support
// ABOUTME: Backs shared conversations in multi-instance and serverless-style deployments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info, warn};

use super::{ConversationStore, StoreKey};
use crate::config::{RedisConnectionConfig, StoreConfig};
use crate::errors::{AppError, AppResult};

/// Redis store using `ConnectionManager` for automatic reconnection
///
/// Keys are written verbatim (`chat:<id>`) so records stay compatible with
/// other readers of the same database.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    async fn new_with_config(config: &StoreConfig) -> AppResult<Self> {
        let redis_url = config
            .redis_url
            .as_ref()
            .ok_or_else(|| AppError::config("Redis URL is required for the Redis store backend"))?;

        let conn_config = &config.redis_connection;
        info!(
            "Connecting to Redis (timeout={}s, response_timeout={}s, retries={})",
            conn_config.connection_timeout_secs,
            conn_config.response_timeout_secs,
            conn_config.initial_connection_retries
        );

        let client = redis::Client::open(redis_url.as_str())
            .map_err(|e| AppError::config_invalid(format!("Invalid Redis URL: {e}")))?;
        let manager = Self::connect_with_retry(&client, conn_config).await?;

        info!("Successfully connected to Redis");
        Ok(Self { manager })
    }

    /// Connect with exponential backoff; only startup is retried, never individual commands
    async fn connect_with_retry(
        client: &redis::Client,
        conn_config: &RedisConnectionConfig,
    ) -> AppResult<ConnectionManager> {
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Duration::from_secs(conn_config.connection_timeout_secs))
            .set_response_timeout(Duration::from_secs(conn_config.response_timeout_secs))
            .set_number_of_retries(conn_config.reconnection_retries)
            .set_exponent_base(conn_config.retry_exponent_base)
            .set_max_delay(conn_config.max_retry_delay_ms);

        let max_retries = conn_config.initial_connection_retries;
        let mut delay_ms = conn_config.initial_retry_delay_ms;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match ConnectionManager::new_with_config(client.clone(), manager_config.clone()).await
            {
                Ok(manager) => {
                    if attempt > 0 {
                        info!("Redis connection established after {} retries", attempt);
                    }
                    return Ok(manager);
                }
                Err(e) => {
                    if attempt < max_retries {
                        warn!(
                            "Redis connection attempt {}/{} failed, retrying in {}ms: {}",
                            attempt + 1,
                            max_retries + 1,
                            delay_ms,
                            e
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        delay_ms = (delay_ms * 2).min(conn_config.max_retry_delay_ms);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(AppError::unavailable(format!(
            "Failed to connect to Redis after {} attempts: {}",
            max_retries + 1,
            last_error.map_or_else(|| "unknown error".to_owned(), |e| e.to_string())
        )))
    }

    fn command_error(operation: &str, e: redis::RedisError) -> AppError {
        error!("Redis {} operation failed: {}", operation, e);
        AppError::from(e)
    }
}

#[async_trait::async_trait]
impl ConversationStore for RedisStore {
    async fn new(config: StoreConfig) -> AppResult<Self> {
        Self::new_with_config(&config).await
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &StoreKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let serialized = serde_json::to_vec(value)?;
        let mut conn = self.manager.clone();

        // SET with EX in one command so the record never exists without expiry
        conn.set_ex::<_, _, ()>(key.to_string(), serialized, ttl.as_secs().max(1))
            .await
            .map_err(|e| Self::command_error("SET", e))
    }

    async fn get<T: DeserializeOwned + Send>(&self, key: &StoreKey) -> AppResult<Option<T>> {
        let mut conn = self.manager.clone();
        let data: Option<Vec<u8>> = conn
            .get(key.to_string())
            .await
            .map_err(|e| Self::command_error("GET", e))?;

        match data {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn exists(&self, key: &StoreKey) -> AppResult<bool> {
        let mut conn = self.manager.clone();
        conn.exists(key.to_string())
            .await
            .map_err(|e| Self::command_error("EXISTS", e))
    }

    async fn ttl(&self, key: &StoreKey) -> AppResult<Option<Duration>> {
        let mut conn = self.manager.clone();
        let ttl_secs: i64 = conn
            .ttl(key.to_string())
            .await
            .map_err(|e| Self::command_error("TTL", e))?;

        // -2: missing key, -1: no expiry
        Ok(u64::try_from(ttl_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs))
    }

    async fn health_check(&self) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::command_error("PING", e))?;

        if response == "PONG" {
            Ok(())
        } else {
            Err(AppError::unavailable(format!(
                "Unexpected Redis PING response '{response}'"
            )))
        }
    }
}
