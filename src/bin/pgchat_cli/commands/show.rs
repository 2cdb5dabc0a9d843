// ABOUTME: Shared conversation viewer for pgchat-cli
// ABOUTME: Loads a snapshot by identifier or share URL and prints the transcript
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pgchat_server::client::ChatClient;
use pgchat_server::errors::{AppError, AppResult};

use crate::helpers::display::display_shared_conversation;

/// Accepts `abc123`, `/chat/abc123`, or a full share URL
fn share_id(raw: &str) -> &str {
    raw.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(raw)
}

/// Print a shared conversation
pub async fn run(client: &ChatClient, template: &str, raw_id: &str) -> AppResult<()> {
    let id = share_id(raw_id);
    let conversation = client
        .fetch_shared(id)
        .await?
        .ok_or_else(|| AppError::not_found("Shared conversation"))?;

    display_shared_conversation(&conversation, template);
    Ok(())
}
