// ABOUTME: Re-exports conversation models from pgchat-core
// ABOUTME: Turn, Role, SharedConversation, and the chat/share request bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pgchat_core::models::*;
