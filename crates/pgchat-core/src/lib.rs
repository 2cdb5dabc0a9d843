// ABOUTME: Core types and constants for the PG chat streaming server
// ABOUTME: Foundation crate with error handling, conversation models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # PG Chat Core
//!
//! Foundation crate providing shared types and constants for the chat server,
//! its terminal client, and the test-suite. This crate is designed to change
//! infrequently, enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the `{error}` body
//! - **constants**: Application-wide constants organized by domain
//! - **models**: Conversation turns and shared conversation snapshots

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants and configuration defaults organized by domain
pub mod constants;

/// Conversation turns and shared conversation snapshots
pub mod models;
