// ABOUTME: OpenAI responses API client streaming typed upstream events over SSE
// ABOUTME: Handles bearer auth, error body mapping, and event payload parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI` Responses Provider
//!
//! Posts a [`ResponseRequest`] to `{base_url}/responses` with `stream: true`
//! and parses the server-sent events into [`UpstreamEvent`]s:
//!
//! | Event type | Mapped to |
//! |---|---|
//! | `response.output_text.delta` | `TextDelta` |
//! | `response.completed` | `Completed` |
//! | `response.failed`, `error` | `Failed` |
//! | anything else | `Other` |

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::sse_parser::create_sse_stream;
use super::{CompletedResponse, EventStream, ResponseRequest, ResponsesProvider, UpstreamEvent};
use crate::config::UpstreamConfig;
use crate::constants::upstream::{PROVIDER_NAME, RESPONSES_PATH};
use crate::errors::{AppError, AppResult};

/// Streaming client for the `OpenAI` responses API
pub struct OpenAiResponsesProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiResponsesProvider {
    /// Create a provider from upstream configuration
    ///
    /// Only a connect timeout is set: a reply may legitimately stream for minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    fn add_auth_header(&self, request: RequestBuilder) -> RequestBuilder {
        if self.api_key.is_empty() {
            request
        } else {
            request.bearer_auth(&self.api_key)
        }
    }

    /// Map a non-success response into an error, preferring the provider's message
    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .and_then(|detail| detail.message)
            .unwrap_or_else(|| {
                format!(
                    "API error ({status}): {}",
                    body.chars().take(200).collect::<String>()
                )
            });

        match status.as_u16() {
            502..=504 => AppError::external_unavailable(PROVIDER_NAME, message),
            _ => AppError::external_service(PROVIDER_NAME, format!("{status} - {message}")),
        }
    }
}

#[async_trait]
impl ResponsesProvider for OpenAiResponsesProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[instrument(skip(self, request), fields(model = %request.model, tools = request.tools.len()))]
    async fn create_response_stream(&self, request: &ResponseRequest) -> AppResult<EventStream> {
        debug!("Opening streaming response");

        let http_request = self
            .client
            .post(self.api_url(RESPONSES_PATH))
            .header("Accept", "text/event-stream")
            .json(request);

        let response = self.add_auth_header(http_request).send().await.map_err(|e| {
            error!("Failed to send streaming request to {}: {}", PROVIDER_NAME, e);
            AppError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Upstream rejected streaming request");
            return Err(Self::parse_error_response(status, &body));
        }

        Ok(create_sse_stream(
            response.bytes_stream(),
            parse_upstream_event,
            PROVIDER_NAME,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    delta: Option<String>,
    #[serde(default)]
    response: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Parse one SSE `data:` payload into an upstream event
///
/// Returns `Some(Err(..))` for payloads that are not valid event JSON; the
/// stream translator treats that like any other mid-stream failure.
#[must_use]
pub fn parse_upstream_event(json: &str) -> Option<AppResult<UpstreamEvent>> {
    let raw: RawEvent = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => {
            return Some(Err(AppError::external_service(
                PROVIDER_NAME,
                format!("Malformed stream event: {e}"),
            )))
        }
    };

    let event = match raw.kind.as_str() {
        "response.output_text.delta" => UpstreamEvent::TextDelta(raw.delta.unwrap_or_default()),
        "response.completed" => {
            let response = raw.response.unwrap_or(Value::Null);
            match serde_json::from_value::<CompletedResponse>(response) {
                Ok(completed) => UpstreamEvent::Completed(completed),
                Err(e) => {
                    return Some(Err(AppError::external_service(
                        PROVIDER_NAME,
                        format!("Malformed completed response: {e}"),
                    )))
                }
            }
        }
        "response.failed" => UpstreamEvent::Failed(
            raw.response
                .as_ref()
                .and_then(|response| response.pointer("/error/message"))
                .and_then(Value::as_str)
                .unwrap_or("response failed")
                .to_owned(),
        ),
        "error" => UpstreamEvent::Failed(raw.message.unwrap_or_else(|| "stream error".to_owned())),
        _ => UpstreamEvent::Other(raw.kind),
    };
    Some(Ok(event))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_prefers_provider_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        let error = OpenAiResponsesProvider::parse_error_response(StatusCode::UNAUTHORIZED, body);
        assert!(error.message.contains("Incorrect API key provided"));
        assert_eq!(error.http_status(), 500);
    }

    #[test]
    fn test_parse_error_non_json_body() {
        let error =
            OpenAiResponsesProvider::parse_error_response(StatusCode::BAD_GATEWAY, "<html>bad</html>");
        assert!(error.message.contains("502"));
    }

    #[test]
    fn test_parse_failed_event_message() {
        let json = r#"{"type":"response.failed","response":{"error":{"message":"quota"}}}"#;
        let event = parse_upstream_event(json).unwrap().unwrap();
        assert_eq!(event, UpstreamEvent::Failed("quota".to_owned()));
    }
}
