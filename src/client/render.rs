// ABOUTME: Presentation-neutral rendering of assistant replies and error bodies
// ABOUTME: Splits replies into bubbles, builds essay links, and extracts error messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::Value;

use crate::protocol::citations::citation_link;

/// A cited essay with its link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationLink {
    /// Filename as reported by retrieval
    pub filename: String,
    /// Essay URL
    pub url: String,
}

/// Reply ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReply {
    /// Paragraph bubbles, non-empty
    pub bubbles: Vec<String>,
    /// Essay links in citation order
    pub citations: Vec<CitationLink>,
}

/// Split assistant text on blank lines, dropping empty parts
#[must_use]
pub fn split_bubbles(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Render display text and citations with the given link template
#[must_use]
pub fn render_reply(text: &str, citations: &[String], template: &str) -> RenderedReply {
    RenderedReply {
        bubbles: split_bubbles(text),
        citations: citations
            .iter()
            .map(|filename| CitationLink {
                filename: filename.clone(),
                url: citation_link(filename, template),
            })
            .collect(),
    }
}

/// Extract a human-readable message from an error response body
///
/// Uses the JSON `error` field when present, otherwise the raw text.
#[must_use]
pub fn describe_error(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(ToOwned::to_owned))
        .unwrap_or_else(|| raw.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_bubbles_drops_empty_parts() {
        assert_eq!(
            split_bubbles("First.\n\n\n\nSecond.\n\n"),
            vec!["First.", "Second."]
        );
    }

    #[test]
    fn test_describe_error() {
        assert_eq!(describe_error(r#"{"error":"Invalid message format"}"#), "Invalid message format");
        assert_eq!(describe_error("Bad Gateway"), "Bad Gateway");
        assert_eq!(describe_error(r#"{"detail":"x"}"#), r#"{"detail":"x"}"#);
    }
}
