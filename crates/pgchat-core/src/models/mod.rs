// ABOUTME: Conversation turn and shared conversation snapshot types
// ABOUTME: Wire shapes shared by the chat endpoint, share endpoint, store, and client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a conversation participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End user input
    User,
    /// Model reply
    Assistant,
    /// Steering instructions, never shown or shared
    System,
}

impl Role {
    /// Get the wire name of the role
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }

    /// Parse a wire name, `None` for unknown roles
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    /// Whether turns with this role may appear in a shared conversation
    #[must_use]
    pub const fn is_shareable(self) -> bool {
        matches!(self, Self::User | Self::Assistant)
    }
}

/// One role-tagged message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced the message
    pub role: Role,
    /// Message text
    pub content: String,
}

impl Turn {
    /// Create a user turn
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Create a system turn
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Immutable, time-limited snapshot of a conversation reachable by identifier
///
/// Non-empty and limited to user/assistant turns; both are enforced by the
/// share service before a snapshot is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedConversation {
    /// Share identifier
    pub id: String,
    /// Shared turns in original order
    pub messages: Vec<Turn>,
    /// Creation time, serialized as RFC 3339
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Successful share response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareResponse {
    /// Share identifier
    pub id: String,
    /// Relative URL of the shared conversation
    pub url: String,
}

/// Chat request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Full conversation, system turns included
    pub messages: Vec<Turn>,
}

/// Share request body as sent by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    /// Turns to snapshot
    pub messages: Vec<Turn>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(Role::parse("system"), Some(Role::System));
        assert_eq!(Role::parse("tool"), None);
        assert!(!Role::System.is_shareable());
    }

    #[test]
    fn test_shared_conversation_uses_camel_case_timestamp() {
        let snapshot = SharedConversation {
            id: "abc".to_owned(),
            messages: vec![Turn::user("hi")],
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
    }
}
