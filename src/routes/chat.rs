// ABOUTME: Chat route streaming upstream replies as prefix-tagged frames
// ABOUTME: Shapes the upstream request, opens the stream, and pipes translated frames to the body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::Response,
    routing::post,
    Router,
};
use futures_util::StreamExt;
use tracing::{debug, error, info};

use crate::constants::endpoints;
use crate::constants::protocol::{
    STREAM_CONTENT_TYPE, STREAM_PROTOCOL_HEADER, STREAM_PROTOCOL_VERSION,
};
use crate::errors::{AppError, ErrorCode};
use crate::llm::ResponseRequest;
use crate::models::ChatRequest;
use crate::protocol::{generate_message_id, translate};
use crate::resources::ServerResources;

/// Client-facing message when the upstream stream cannot be opened for a non-provider reason
pub const CHAT_FAILED: &str = "Failed to generate response";

/// Provider failures keep the provider's message; anything else is reported generically
fn upstream_failure(e: AppError) -> AppError {
    let message = match e.code {
        ErrorCode::ExternalServiceError | ErrorCode::ExternalServiceUnavailable => e.message.clone(),
        _ => CHAT_FAILED.to_owned(),
    };
    AppError::new(ErrorCode::ExternalServiceError, message).with_source(e)
}

/// Chat routes
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create the chat streaming route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(endpoints::CHAT, post(Self::chat))
            .with_state(resources)
    }

    /// Stream a reply for the posted conversation
    ///
    /// Errors before the first byte become a JSON `{error}` response; once the
    /// body has started, failures truncate the frame stream instead.
    async fn chat(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
            debug!(error = %e, "Rejected chat request body");
            AppError::invalid_input("Invalid request body")
        })?;

        let upstream_request =
            ResponseRequest::from_conversation(&request.messages, &resources.config.upstream);
        info!(
            turns = request.messages.len(),
            model = %upstream_request.model,
            "Starting chat completion"
        );

        let events = resources
            .provider
            .create_response_stream(&upstream_request)
            .await
            .map_err(|e| {
                error!(provider = resources.provider.name(), error = %e, "Failed to open upstream stream");
                upstream_failure(e)
            })?;

        let frames = translate(
            events,
            resources.config.stream.citation_mode,
            generate_message_id(),
        );
        let body = Body::from_stream(
            frames.map(|frame| Ok::<_, Infallible>(Bytes::from(frame.to_line()))),
        );

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, STREAM_CONTENT_TYPE)
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::CONNECTION, "keep-alive")
            .header(STREAM_PROTOCOL_HEADER, STREAM_PROTOCOL_VERSION)
            .body(body)
            .map_err(|e| AppError::internal(format!("Failed to build stream response: {e}")))
    }
}
