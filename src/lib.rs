// ABOUTME: Main library entry point for the PG chat streaming server
// ABOUTME: Streams hosted-model replies with citations and serves shareable conversation snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # PG Chat Server
//!
//! A conversational front-end over a hosted language-model "responses" API.
//! The server forwards a conversation upstream, translates the provider's
//! server-sent events into a line-delimited chunk protocol, carries retrieval
//! citations through that protocol, and persists read-only conversation
//! snapshots behind shareable links.
//!
//! ## Architecture
//!
//! - **Store**: Key-value facade over Redis or an in-memory LRU with TTL
//! - **LLM**: Streaming client for the upstream create-response operation
//! - **Protocol**: Frame encoding, citation collection, and the stream translator
//! - **Share**: Message validation, identifier generation, and snapshot persistence
//! - **Routes**: Axum handlers for chat, share, and health endpoints
//! - **Client**: Frame decoder and reply rendering used by `pgchat-cli`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pgchat_server::config::ServerConfig;
//! use pgchat_server::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("PG chat server configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Chat client: frame decoding, reply rendering, and share calls
pub mod client;

/// Configuration management from environment variables
pub mod config;

/// Application constants (re-exported from `pgchat-core`)
pub mod constants;

/// Unified error handling (re-exported from `pgchat-core`)
pub mod errors;

/// Upstream model provider abstraction and `OpenAI` responses client
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware (CORS)
pub mod middleware;

/// Conversation models (re-exported from `pgchat-core`)
pub mod models;

/// Downstream chunk protocol, citations, and stream translation
pub mod protocol;

/// Shared server resources handed to every route
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;

/// Shared conversation service
pub mod share;

/// Key-value conversation store
pub mod store;
