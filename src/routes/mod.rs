// ABOUTME: Route module organization for the chat server HTTP endpoints
// ABOUTME: Chat streaming, conversation sharing, and health checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Each domain module contains only route definitions and thin handlers that
//! delegate to the protocol, share, and store layers.

/// Chat streaming route
pub mod chat;
/// Health check and readiness routes
pub mod health;
/// Share creation and lookup routes
pub mod share;

pub use chat::ChatRoutes;
pub use health::HealthRoutes;
pub use share::ShareRoutes;
