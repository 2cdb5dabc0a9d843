// ABOUTME: Shared conversation constants for retention, key layout, and identifiers
// ABOUTME: The identifier alphabet and length define the public share URL format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Snapshot retention: 30 days
pub const TTL_SECS: u64 = 60 * 60 * 24 * 30;

/// Store key prefix, keys are `chat:<id>`
pub const KEY_PREFIX: &str = "chat:";

/// Characters an identifier may contain
pub const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789-";

/// Default identifier length
pub const DEFAULT_ID_LENGTH: usize = 16;

/// Shortest identifier length accepted from configuration
pub const MIN_ID_LENGTH: usize = 8;

/// Longest identifier length accepted from configuration
pub const MAX_ID_LENGTH: usize = 64;

/// Identifier regenerations attempted when a collision is detected
pub const MAX_ID_ATTEMPTS: usize = 5;

/// Path prefix of the share URL returned to clients
pub const DEFAULT_PATH_PREFIX: &str = "/chat";
