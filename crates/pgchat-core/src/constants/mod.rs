// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for the chat stream, shares, store, and upstream provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! large file. Runtime configuration in the server crate uses these as defaults.

/// Key-value store constants (capacity, cleanup, Redis connection)
pub mod store;
/// Shared conversation constants (TTL, key prefix, identifier alphabet)
pub mod share;
/// Upstream provider defaults (model, base URL, fallback input)
pub mod upstream;
/// Downstream chunk protocol tags and finish metadata
pub mod protocol;

/// API endpoints
pub mod endpoints {
    /// Chat streaming endpoint
    pub const CHAT: &str = "/api/chat";
    /// Share creation endpoint
    pub const SHARE: &str = "/api/share";
    /// Shared conversation lookup, with `:id` path parameter
    pub const SHARED_CHAT: &str = "/chat/:id";
    /// Liveness endpoint
    pub const HEALTH: &str = "/health";
    /// Readiness endpoint
    pub const READY: &str = "/ready";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8080;
    /// Default bind host
    pub const DEFAULT_HOST: &str = "0.0.0.0";
}

/// Service names used in structured logs
pub mod service_names {
    /// Chat server binary
    pub const PGCHAT_SERVER: &str = "pgchat-server";
    /// Terminal client binary
    pub const PGCHAT_CLI: &str = "pgchat-cli";
}
