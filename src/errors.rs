// ABOUTME: Re-exports the unified error types from pgchat-core
// ABOUTME: Keeps crate::errors paths stable for routes, store, and provider code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pgchat_core::errors::*;
