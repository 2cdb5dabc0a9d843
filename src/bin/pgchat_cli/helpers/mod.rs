// ABOUTME: Helper modules for pgchat-cli
// ABOUTME: Terminal output formatting for replies and shared conversations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod display;
