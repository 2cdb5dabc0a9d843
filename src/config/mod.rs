// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-only configuration for HTTP, upstream provider, store, shares, and CORS
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the chat server
//!
//! - **Environment**: Server, upstream, share, stream, and CORS settings
//! - **Store**: Key-value store backend selection and Redis connection tuning

/// Environment and server configuration
pub mod environment;
/// Key-value store configuration
pub mod store;

pub use environment::{
    CorsConfig, ServerConfig, ShareConfig, StreamConfig, UpstreamConfig,
};
pub use store::{RedisConnectionConfig, StoreConfig};
