// ABOUTME: Command modules for pgchat-cli
// ABOUTME: Interactive chat session and shared conversation viewer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod chat;
pub mod show;
