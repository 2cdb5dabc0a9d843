// ABOUTME: HTTP client for the chat server used by the command-line chat interface
// ABOUTME: Streams chat replies frame by frame, shares conversations, and loads shared snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chat Client
//!
//! Consumes the line-framed chat stream. A reply whose stream ends before
//! the final `d:` frame is returned with `complete == false` so callers can
//! mark it as cut off instead of treating the partial text as finished.
//!
//! The client must be told which [`CitationMode`] the server runs with:
//! in frame mode a text ending in `<...>` is ordinary text, in suffix mode
//! it carries the citations.

/// Frame decoding and reply accumulation
pub mod decoder;
/// Reply and error rendering helpers
pub mod render;

pub use decoder::{AssistantReply, FrameDecoder, ReplyAccumulator};
pub use render::{describe_error, render_reply, split_bubbles, CitationLink, RenderedReply};

use futures_util::StreamExt;
use reqwest::{Client, Response, StatusCode};
use serde_json::json;
use tracing::{debug, warn};

use crate::constants::{endpoints, share};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{ShareResponse, SharedConversation, Turn};
use crate::protocol::{CitationMode, Frame};

/// Client for a running chat server
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    citation_mode: CitationMode,
}

impl ChatClient {
    /// Create a client for the server at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            citation_mode: CitationMode::default(),
        }
    }

    /// Expect citations the way a server in `mode` delivers them
    #[must_use]
    pub fn with_citation_mode(mut self, mode: CitationMode) -> Self {
        self.citation_mode = mode;
        self
    }

    /// Server base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Citation delivery the client expects
    #[must_use]
    pub const fn citation_mode(&self) -> CitationMode {
        self.citation_mode
    }

    /// Send the conversation and collect the full reply
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the request or the stream is malformed
    pub async fn send(&self, turns: &[Turn]) -> AppResult<AssistantReply> {
        self.send_streaming(turns, |_| {}).await
    }

    /// Send the conversation, invoking `on_frame` as each frame arrives
    ///
    /// A transport failure after the stream started ends the reply early
    /// rather than failing it; the returned reply is then incomplete.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the request or a frame cannot be decoded
    pub async fn send_streaming<F>(&self, turns: &[Turn], mut on_frame: F) -> AppResult<AssistantReply>
    where
        F: FnMut(&Frame) + Send,
    {
        let response = self
            .client
            .post(self.url(endpoints::CHAT))
            .json(&json!({ "messages": turns }))
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let mut decoder = FrameDecoder::new();
        let mut reply = ReplyAccumulator::new(self.citation_mode);
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!(error = %e, "Chat stream interrupted");
                    break;
                }
            };
            for frame in decoder.feed(&chunk)? {
                on_frame(&frame);
                reply.apply(frame);
            }
        }
        if let Some(frame) = decoder.finish()? {
            on_frame(&frame);
            reply.apply(frame);
        }

        let reply = reply.into_reply();
        debug!(
            message_id = ?reply.message_id,
            complete = reply.complete,
            citations = reply.citations.len(),
            "Chat reply received"
        );
        Ok(reply)
    }

    /// Share the conversation
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the snapshot or cannot store it
    pub async fn share(&self, turns: &[Turn]) -> AppResult<ShareResponse> {
        let response = self
            .client
            .post(self.url(endpoints::SHARE))
            .json(&json!({ "messages": turns }))
            .send()
            .await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    /// Load a shared conversation; `None` when unknown or expired
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails or returns an unexpected body
    pub async fn fetch_shared(&self, id: &str) -> AppResult<Option<SharedConversation>> {
        let response = self
            .client
            .get(self.url(&format!("{}/{id}", share::DEFAULT_PATH_PREFIX)))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::check_status(response).await?.json().await?))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check_status(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = describe_error(&body);
        let code = match status {
            StatusCode::BAD_REQUEST => ErrorCode::InvalidInput,
            StatusCode::NOT_FOUND => ErrorCode::ResourceNotFound,
            StatusCode::SERVICE_UNAVAILABLE => ErrorCode::ResourceUnavailable,
            _ => ErrorCode::ExternalServiceError,
        };
        Err(AppError::new(code, message))
    }
}
