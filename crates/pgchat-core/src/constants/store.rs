// ABOUTME: Key-value store constants for in-memory capacity and Redis connection tuning
// ABOUTME: Defaults used when the corresponding environment variables are absent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Default maximum entries for the in-memory store
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Default cleanup interval in seconds for expired entries
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;

/// Redis connection defaults
pub mod redis {
    /// Connection timeout in seconds
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;
    /// Per-command response timeout in seconds
    pub const RESPONSE_TIMEOUT_SECS: u64 = 5;
    /// Reconnection attempts made by the connection manager
    pub const RECONNECTION_RETRIES: usize = 5;
    /// Exponential backoff base for reconnection
    pub const RETRY_EXPONENT_BASE: u64 = 2;
    /// Maximum delay between reconnection attempts
    pub const MAX_RETRY_DELAY_MS: u64 = 30_000;
    /// Attempts made when establishing the first connection at startup
    pub const INITIAL_CONNECTION_RETRIES: u32 = 3;
    /// Delay before the first startup retry
    pub const INITIAL_RETRY_DELAY_MS: u64 = 500;
}
