// ABOUTME: Share routes for creating and reading conversation snapshots
// ABOUTME: POST /api/share persists validated turns, GET /chat/:id returns the snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{debug, error};

use crate::constants::endpoints;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::share::validate_messages;

/// Share routes
pub struct ShareRoutes;

impl ShareRoutes {
    /// Create share creation and lookup routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(endpoints::SHARE, post(Self::create_share))
            .route(endpoints::SHARED_CHAT, get(Self::get_shared))
            .with_state(resources)
    }

    async fn create_share(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let body: Value = serde_json::from_slice(&body)
            .ok()
            .filter(Value::is_object)
            .ok_or_else(|| {
                debug!("Rejected share request body");
                AppError::invalid_input("Invalid request body")
            })?;

        let turns = validate_messages(&body)?;
        let response = resources.shares.create(turns).await?;

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    async fn get_shared(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let snapshot = resources.shares.get(&id).await.map_err(|e| {
            error!(share_id = %id, error = %e, "Failed to load shared conversation");
            AppError::internal("Failed to load shared chat")
        })?;

        snapshot.map_or_else(
            || Err(AppError::not_found("Shared conversation")),
            |snapshot| Ok((StatusCode::OK, Json(snapshot)).into_response()),
        )
    }
}
