// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides a scripted upstream provider and in-memory server resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `pgchat_server`

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use futures_util::stream;
use pgchat_server::{
    config::ServerConfig,
    errors::{AppError, AppResult, ErrorCode},
    llm::{
        Annotation, CompletedResponse, EventStream, OutputItem, ResponseRequest,
        ResponsesProvider, UpstreamEvent,
    },
    protocol::{CitationMode, Frame},
    resources::ServerResources,
    server,
    store::Store,
};
use serde_json::Value;
use tokio::net::TcpListener;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Provider that replays a fixed event script and records every request
pub struct ScriptedProvider {
    script: Result<Vec<AppResult<UpstreamEvent>>, (ErrorCode, &'static str)>,
    requests: Mutex<Vec<ResponseRequest>>,
}

impl ScriptedProvider {
    /// Provider that streams the given events
    pub fn streaming(events: Vec<AppResult<UpstreamEvent>>) -> Self {
        Self {
            script: Ok(events),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Provider whose upstream refuses the connection before streaming
    pub fn failing() -> Self {
        Self::failing_with(ErrorCode::ExternalServiceUnavailable, "OpenAI: connection refused")
    }

    /// Provider that fails before streaming with the given error
    pub fn failing_with(code: ErrorCode, message: &'static str) -> Self {
        Self {
            script: Err((code, message)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ResponseRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponsesProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn create_response_stream(&self, request: &ResponseRequest) -> AppResult<EventStream> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.script {
            Ok(events) => {
                let events: Vec<AppResult<UpstreamEvent>> = events
                    .iter()
                    .map(|event| match event {
                        Ok(event) => Ok(event.clone()),
                        Err(e) => Err(AppError::new(e.code, e.message.clone())),
                    })
                    .collect();
                Ok(Box::pin(stream::iter(events)))
            }
            Err((code, message)) => Err(AppError::new(*code, *message)),
        }
    }
}

/// Completion event whose single message cites the given files
pub fn completed_with_citations(text: &str, filenames: &[&str]) -> UpstreamEvent {
    UpstreamEvent::Completed(CompletedResponse {
        id: Some("resp_test".to_owned()),
        output: vec![OutputItem::message(
            text,
            filenames
                .iter()
                .map(|name| Annotation::file_citation(*name))
                .collect(),
        )],
    })
}

/// The "Hello" / " world" reply without citations
pub fn hello_world_script() -> Vec<AppResult<UpstreamEvent>> {
    vec![
        Ok(UpstreamEvent::Other("response.created".to_owned())),
        Ok(UpstreamEvent::TextDelta("Hello".to_owned())),
        Ok(UpstreamEvent::TextDelta(" world".to_owned())),
        Ok(completed_with_citations("Hello world", &[])),
    ]
}

/// Server resources over the in-memory store and the given provider
pub async fn test_resources(
    provider: Arc<ScriptedProvider>,
    citation_mode: CitationMode,
) -> Arc<ServerResources> {
    init_test_logging();
    let mut config = ServerConfig::default();
    config.stream.citation_mode = citation_mode;
    let store = Store::in_memory().await.unwrap();
    Arc::new(ServerResources::new(config, store, provider))
}

/// Decode a full chat body into frames
pub fn decode_frames(body: &str) -> Vec<Frame> {
    body.lines()
        .filter_map(|line| Frame::decode(line).unwrap())
        .collect()
}

// ============================================================================
// In-process HTTP servers
// ============================================================================

/// Request captured by the fake upstream
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct FakeUpstream {
    status: StatusCode,
    body: &'static str,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn fake_responses(
    State(upstream): State<FakeUpstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned)
    };
    upstream.captured.lock().unwrap().push(CapturedRequest {
        authorization: header_value("authorization"),
        accept: header_value("accept"),
        body,
    });

    let content_type = if upstream.status.is_success() {
        "text/event-stream"
    } else {
        "application/json"
    };
    (
        upstream.status,
        [(header::CONTENT_TYPE, content_type)],
        upstream.body,
    )
        .into_response()
}

/// Serve a fake Responses API on an ephemeral port
///
/// Returns the base URL (ending in `/v1`) and the captured requests.
pub async fn spawn_fake_upstream(
    status: StatusCode,
    body: &'static str,
) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v1/responses", post(fake_responses))
        .with_state(FakeUpstream {
            status,
            body,
            captured: Arc::clone(&captured),
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1"), captured)
}

/// Serve the full application on an ephemeral port and return its base URL
pub async fn spawn_app(resources: Arc<ServerResources>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, resources, std::future::pending::<()>()));
    format!("http://{addr}")
}

/// Upstream SSE body for "Hello world" citing two essays, one of them twice
pub const UPSTREAM_SSE_BODY: &str = "event: response.created\n\
data: {\"type\":\"response.created\",\"response\":{\"id\":\"resp_1\"}}\n\
\n\
event: response.output_text.delta\n\
data: {\"type\":\"response.output_text.delta\",\"delta\":\"Hello\"}\n\
\n\
event: response.output_text.delta\n\
data: {\"type\":\"response.output_text.delta\",\"delta\":\" world\"}\n\
\n\
event: response.completed\n\
data: {\"type\":\"response.completed\",\"response\":{\"id\":\"resp_1\",\"output\":[{\"type\":\"file_search_call\"},{\"type\":\"message\",\"content\":[{\"type\":\"output_text\",\"text\":\"Hello world\",\"annotations\":[{\"type\":\"file_citation\",\"filename\":\"essay1.txt\",\"file_id\":\"f1\"},{\"type\":\"file_citation\",\"filename\":\"essay2.txt\",\"file_id\":\"f2\"},{\"type\":\"file_citation\",\"filename\":\"essay1.txt\",\"file_id\":\"f1\"}]}]}]}}\n\
\n\
data: [DONE]\n\
\n";
