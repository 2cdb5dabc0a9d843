// ABOUTME: Downstream chunk protocol: prefix-tagged, newline-delimited frames
// ABOUTME: Encodes and decodes format, text, citation, end, and final frames plus message ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chat Stream Protocol
//!
//! Each line of a chat response body is `<tag>:<json>`:
//!
//! ```text
//! f:{"messageId":"msg-1718000000000-k3j9x0ab"}
//! 0:"Hel"
//! 0:"lo"
//! c:{"citations":["essay1.txt"]}
//! e:{"finishReason":"stop","usage":{"promptTokens":0,"completionTokens":0},"isContinued":false}
//! d:{"finishReason":"stop","usage":{"promptTokens":0,"completionTokens":0}}
//! ```
//!
//! The `c:` frame only appears in [`CitationMode::Frame`]; in
//! [`CitationMode::TextSuffix`] citations travel as a trailing `0:` frame.

/// Citation collection and the legacy text-suffix convention
pub mod citations;
/// Upstream-event to frame translation
pub mod translator;

pub use translator::{translate, FrameStream};

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::constants::protocol::{
    FINISH_REASON_STOP, MESSAGE_ID_PREFIX, MESSAGE_ID_SUFFIX_LEN, TAG_CITATIONS, TAG_END,
    TAG_FINAL, TAG_FORMAT, TAG_TEXT,
};
use crate::errors::{AppError, AppResult};

/// Token usage reported in finish frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    /// Prompt tokens (not tracked, always zero)
    pub prompt_tokens: u64,
    /// Completion tokens (not tracked, always zero)
    pub completion_tokens: u64,
}

/// Payload of the format frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatPayload {
    /// Identifier of the assistant message being streamed
    pub message_id: String,
}

/// Payload of the citation frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationsPayload {
    /// Cited filenames, ordered and de-duplicated
    pub citations: Vec<String>,
}

/// Payload of the end-of-step frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFinish {
    /// Why generation stopped
    pub finish_reason: String,
    /// Token usage
    pub usage: Usage,
    /// Whether another step follows
    pub is_continued: bool,
}

/// Payload of the final frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFinish {
    /// Why generation stopped
    pub finish_reason: String,
    /// Token usage
    pub usage: Usage,
}

impl Default for StepFinish {
    fn default() -> Self {
        Self {
            finish_reason: FINISH_REASON_STOP.to_owned(),
            usage: Usage::default(),
            is_continued: false,
        }
    }
}

impl Default for MessageFinish {
    fn default() -> Self {
        Self {
            finish_reason: FINISH_REASON_STOP.to_owned(),
            usage: Usage::default(),
        }
    }
}

/// One line of the chat stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// First frame, announces the message identifier
    Format(FormatPayload),
    /// Text fragment
    Text(String),
    /// Structured citation list
    Citations(CitationsPayload),
    /// End of the generation step
    End(StepFinish),
    /// End of the message
    Final(MessageFinish),
}

impl Frame {
    /// Format frame for a message identifier
    #[must_use]
    pub fn format(message_id: impl Into<String>) -> Self {
        Self::Format(FormatPayload {
            message_id: message_id.into(),
        })
    }

    /// Tag character of the frame
    #[must_use]
    pub const fn tag(&self) -> char {
        match self {
            Self::Format(_) => TAG_FORMAT,
            Self::Text(_) => TAG_TEXT,
            Self::Citations(_) => TAG_CITATIONS,
            Self::End(_) => TAG_END,
            Self::Final(_) => TAG_FINAL,
        }
    }

    /// Encode the frame as a single line without the trailing newline
    #[must_use]
    pub fn encode(&self) -> String {
        let payload = match self {
            Self::Format(payload) => to_json(payload),
            Self::Text(text) => Value::String(text.clone()).to_string(),
            Self::Citations(payload) => to_json(payload),
            Self::End(payload) => to_json(payload),
            Self::Final(payload) => to_json(payload),
        };
        format!("{}:{payload}", self.tag())
    }

    /// Encode the frame as a newline-terminated line
    #[must_use]
    pub fn to_line(&self) -> String {
        let mut line = self.encode();
        line.push('\n');
        line
    }

    /// Decode one line; `Ok(None)` for blank lines and unknown tags
    ///
    /// # Errors
    ///
    /// Returns an error if the line has no tag separator or a known tag carries
    /// an invalid payload
    pub fn decode(line: &str) -> AppResult<Option<Self>> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }

        let (tag, payload) = line
            .split_once(':')
            .ok_or_else(|| AppError::invalid_format(format!("Frame without tag: {line}")))?;

        let frame = match tag {
            "f" => Self::Format(from_json(payload)?),
            "0" => Self::Text(from_json(payload)?),
            "c" => Self::Citations(from_json(payload)?),
            "e" => Self::End(from_json(payload)?),
            "d" => Self::Final(from_json(payload)?),
            _ => return Ok(None),
        };
        Ok(Some(frame))
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        error!("Frame payload serialization failed: {}", e);
        "null".to_owned()
    })
}

fn from_json<T: for<'de> Deserialize<'de>>(payload: &str) -> AppResult<T> {
    serde_json::from_str(payload)
        .map_err(|e| AppError::invalid_format(format!("Invalid frame payload: {e}")))
}

/// Generate a message identifier: `msg-<unix millis>-<8 base36 chars>`
///
/// Uniqueness is best effort; identifiers only correlate frames within one response.
#[must_use]
pub fn generate_message_id() -> String {
    const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..MESSAGE_ID_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    format!(
        "{MESSAGE_ID_PREFIX}-{}-{suffix}",
        Utc::now().timestamp_millis()
    )
}

/// How citations are delivered to clients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CitationMode {
    /// Dedicated `c:` frame
    #[default]
    Frame,
    /// Trailing `0:` frame with `\n\n<a|b|c>` appended to the text
    TextSuffix,
}

impl fmt::Display for CitationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Frame => "frame",
            Self::TextSuffix => "suffix",
        })
    }
}

impl FromStr for CitationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frame" => Ok(Self::Frame),
            "suffix" | "text" => Ok(Self::TextSuffix),
            other => Err(format!("unknown citation mode '{other}' (expected frame or suffix)")),
        }
    }
}
