// ABOUTME: Upstream model provider abstraction for the streaming create-response operation
// ABOUTME: Defines request shaping, typed upstream events, and the pluggable provider trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Upstream Provider Interface
//!
//! The chat endpoint never talks to a concrete provider. It shapes a
//! [`ResponseRequest`] from the conversation and asks a [`ResponsesProvider`]
//! for an [`EventStream`]. Production uses [`OpenAiResponsesProvider`]; tests
//! plug in scripted providers.
//!
//! ## Example: Shaping a request
//!
//! ```rust
//! use pgchat_server::config::UpstreamConfig;
//! use pgchat_server::llm::{ResponseInput, ResponseRequest};
//! use pgchat_server::models::Turn;
//!
//! let turns = vec![Turn::system("Be brief."), Turn::user("What is a startup?")];
//! let request = ResponseRequest::from_conversation(&turns, &UpstreamConfig::default());
//! assert_eq!(request.instructions, "Be brief.");
//! assert!(matches!(request.input, ResponseInput::Turns(ref t) if t.len() == 1));
//! ```

mod openai;
pub mod prompts;
pub mod sse_parser;

pub use openai::{parse_upstream_event, OpenAiResponsesProvider};

use std::pin::Pin;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_stream::Stream;

use crate::config::UpstreamConfig;
use crate::constants::upstream::{FALLBACK_INPUT, FILE_CITATION, MESSAGE_OUTPUT};
use crate::errors::AppResult;
use crate::models::{Role, Turn};

// ============================================================================
// Request Types
// ============================================================================

/// Conversation input: a bare string when no turns remain, otherwise role-tagged turns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseInput {
    /// Literal text input
    Text(String),
    /// Ordered user/assistant turns
    Turns(Vec<Turn>),
}

/// Output text format options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOptions {
    /// Requested output format
    pub format: TextFormat,
}

/// Output text format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFormat {
    /// Format kind, always `text`
    #[serde(rename = "type")]
    pub kind: String,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            format: TextFormat {
                kind: "text".to_owned(),
            },
        }
    }
}

/// Hosted tool enabled for the response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    /// Retrieval over provider-hosted vector stores
    FileSearch {
        /// Stores to search
        vector_store_ids: Vec<String>,
        /// Optional cap on returned results
        #[serde(skip_serializing_if = "Option::is_none")]
        max_num_results: Option<u32>,
    },
}

/// Streaming create-response request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRequest {
    /// Model name
    pub model: String,
    /// Instructions steering the model
    pub instructions: String,
    /// Conversation input
    pub input: ResponseInput,
    /// Output text options
    pub text: TextOptions,
    /// Hosted tools
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    /// Always true: the chat endpoint only streams
    pub stream: bool,
    /// Whether the provider retains the response
    pub store: bool,
}

impl ResponseRequest {
    /// Shape a request from a full conversation
    ///
    /// System turns are removed from the input and the last one becomes the
    /// instructions. When no user or assistant turns remain, the input is the
    /// literal fallback string.
    #[must_use]
    pub fn from_conversation(turns: &[Turn], config: &UpstreamConfig) -> Self {
        let instructions = turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::System)
            .map_or_else(
                || config.default_instructions.clone(),
                |turn| turn.content.clone(),
            );

        let conversation: Vec<Turn> = turns
            .iter()
            .filter(|turn| turn.role != Role::System)
            .cloned()
            .collect();

        let input = if conversation.is_empty() {
            ResponseInput::Text(FALLBACK_INPUT.to_owned())
        } else {
            ResponseInput::Turns(conversation)
        };

        let tools = if config.vector_store_ids.is_empty() {
            Vec::new()
        } else {
            vec![Tool::FileSearch {
                vector_store_ids: config.vector_store_ids.clone(),
                max_num_results: config.file_search_max_results,
            }]
        };

        Self {
            model: config.model.clone(),
            instructions,
            input,
            text: TextOptions::default(),
            tools,
            stream: true,
            store: config.store_responses,
        }
    }
}

// ============================================================================
// Upstream Events
// ============================================================================

/// Annotation attached to a content part
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation kind, `file_citation` for retrieval citations
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Cited file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Cited file identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

impl Annotation {
    /// Create a file citation annotation
    #[must_use]
    pub fn file_citation(filename: impl Into<String>) -> Self {
        Self {
            kind: FILE_CITATION.to_owned(),
            filename: Some(filename.into()),
            file_id: None,
        }
    }
}

/// Content part of an output item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPart {
    /// Part kind, e.g. `output_text`
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Text of the part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Annotations on the text
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Item of a completed response's output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputItem {
    /// Item kind; assistant text lives in `message` items
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Content parts
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

impl OutputItem {
    /// Create a message item with one text part carrying the given annotations
    #[must_use]
    pub fn message(text: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        Self {
            kind: MESSAGE_OUTPUT.to_owned(),
            content: vec![ContentPart {
                kind: "output_text".to_owned(),
                text: Some(text.into()),
                annotations,
            }],
        }
    }
}

/// Full response object delivered with the completion event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedResponse {
    /// Provider response identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Output items
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

/// Typed event from the upstream stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamEvent {
    /// Incremental assistant text
    TextDelta(String),
    /// Response finished; carries the full response object
    Completed(CompletedResponse),
    /// Provider reported a failure mid-stream
    Failed(String),
    /// Any other event kind, ignored by the translator
    Other(String),
}

/// Stream of upstream events
pub type EventStream = Pin<Box<dyn Stream<Item = AppResult<UpstreamEvent>> + Send>>;

// ============================================================================
// Provider Trait
// ============================================================================

/// Upstream provider capable of streaming a response
#[async_trait]
pub trait ResponsesProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Open a streaming response
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the provider rejects it
    /// before streaming begins
    async fn create_response_stream(&self, request: &ResponseRequest) -> AppResult<EventStream>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_last_system_turn_wins() {
        let turns = vec![
            Turn::system("first"),
            Turn::user("hi"),
            Turn::system("second"),
        ];
        let request = ResponseRequest::from_conversation(&turns, &UpstreamConfig::default());
        assert_eq!(request.instructions, "second");
        assert_eq!(request.input, ResponseInput::Turns(vec![Turn::user("hi")]));
    }

    #[test]
    fn test_fallback_input_and_default_instructions() {
        let request = ResponseRequest::from_conversation(&[], &UpstreamConfig::default());
        assert_eq!(request.input, ResponseInput::Text("Hello".to_owned()));
        assert_eq!(request.instructions, prompts::DEFAULT_INSTRUCTIONS);
        assert!(request.tools.is_empty());
    }

    #[test]
    fn test_request_wire_shape() {
        let config = UpstreamConfig {
            vector_store_ids: vec!["vs_essays".to_owned()],
            file_search_max_results: Some(4),
            ..UpstreamConfig::default()
        };
        let request = ResponseRequest::from_conversation(&[Turn::user("hi")], &config);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["text"]["format"]["type"], "text");
        assert_eq!(value["stream"], true);
        assert_eq!(value["store"], true);
        assert_eq!(value["input"][0]["role"], "user");
        assert_eq!(value["tools"][0]["type"], "file_search");
        assert_eq!(value["tools"][0]["vector_store_ids"][0], "vs_essays");
        assert_eq!(value["tools"][0]["max_num_results"], 4);
    }
}
