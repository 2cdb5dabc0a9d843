// ABOUTME: Health check route handlers for liveness and readiness checks
// ABOUTME: Readiness verifies the conversation store backend responds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::constants::endpoints;
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health and readiness routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(endpoints::HEALTH, get(Self::health))
            .route(endpoints::READY, get(Self::ready))
            .with_state(resources)
    }

    async fn health() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "timestamp": Utc::now().to_rfc3339()
        }))
    }

    async fn ready(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Json<Value>, AppError> {
        resources.store.health_check().await.map_err(|e| {
            warn!(error = %e, "Readiness check failed");
            AppError::unavailable("Store unavailable")
        })?;

        Ok(Json(json!({
            "status": "ready",
            "store": resources.store.backend_name(),
            "timestamp": Utc::now().to_rfc3339()
        })))
    }
}
