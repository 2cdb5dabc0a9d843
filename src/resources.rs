// ABOUTME: Shared server resources handed to every route through axum state
// ABOUTME: Bundles configuration, the conversation store, share service, and upstream provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::llm::{OpenAiResponsesProvider, ResponsesProvider};
use crate::share::ShareService;
use crate::store::Store;

/// Long-lived resources shared across requests
///
/// Nothing here is mutated per request; the store handle is internally
/// synchronized.
pub struct ServerResources {
    /// Loaded configuration
    pub config: ServerConfig,
    /// Conversation store backend
    pub store: Store,
    /// Shared conversation service over `store`
    pub shares: ShareService,
    /// Upstream model provider
    pub provider: Arc<dyn ResponsesProvider>,
}

impl ServerResources {
    /// Assemble resources from parts
    #[must_use]
    pub fn new(config: ServerConfig, store: Store, provider: Arc<dyn ResponsesProvider>) -> Self {
        let shares = ShareService::new(store.clone(), config.share.clone());
        Self {
            config,
            store,
            shares,
            provider,
        }
    }

    /// Build production resources: configured store backend and `OpenAI` provider
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be initialized or the HTTP client cannot be built
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        let store = Store::new(config.store.clone()).await?;
        let provider: Arc<dyn ResponsesProvider> =
            Arc::new(OpenAiResponsesProvider::new(&config.upstream)?);
        Ok(Self::new(config, store, provider))
    }
}
