// ABOUTME: Re-exports application constants from pgchat-core
// ABOUTME: Domain modules cover the stream protocol, shares, store, and upstream defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pgchat_core::constants::*;
