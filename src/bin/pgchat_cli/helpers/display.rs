// ABOUTME: Output formatting helpers for pgchat-cli
// ABOUTME: Prints reply bubbles, essay links, share links, and shared transcripts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pgchat_server::client::{render_reply, AssistantReply, RenderedReply};
use pgchat_server::models::{Role, ShareResponse, SharedConversation};

/// Print the session banner
pub fn display_banner(server: &str) {
    println!("\nPG Chat ({server})");
    println!("{}", "=".repeat(60));
    println!("Type a message and press Enter.");
    println!("Commands: /share  /reset  /quit");
    println!("{}", "=".repeat(60));
}

/// Print a finished assistant reply as bubbles followed by essay links
pub fn display_reply(reply: &AssistantReply, template: &str) {
    let rendered = render_reply(&reply.text, &reply.citations, template);
    for bubble in &rendered.bubbles {
        println!("\n  {bubble}");
    }
    display_citations(&rendered);
    if !reply.complete {
        println!("\n  [reply interrupted]");
    }
    println!();
}

/// Print essay links, if any
pub fn display_citations(rendered: &RenderedReply) {
    if rendered.citations.is_empty() {
        return;
    }
    println!("\n  Sources:");
    for link in &rendered.citations {
        println!("   - {} ({})", link.filename, link.url);
    }
}

/// Print the link to a newly shared conversation
pub fn display_share(server: &str, share: &ShareResponse) {
    println!("\nConversation shared");
    println!("   ID:  {}", share.id);
    println!("   URL: {server}{}", share.url);
    println!();
}

/// Print a shared conversation transcript
pub fn display_shared_conversation(conversation: &SharedConversation, template: &str) {
    println!("\nShared conversation {}", conversation.id);
    println!(
        "   Created: {}",
        conversation.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!("{}", "=".repeat(60));

    for turn in &conversation.messages {
        match turn.role {
            Role::User => println!("\nYou: {}", turn.content),
            Role::Assistant | Role::System => {
                let (text, citations) =
                    pgchat_server::protocol::citations::split_citation_suffix(&turn.content);
                let rendered = render_reply(&text, &citations, template);
                println!();
                for bubble in &rendered.bubbles {
                    println!("  {bubble}");
                }
                display_citations(&rendered);
            }
        }
    }
    println!();
}

/// Print a failed request
pub fn display_error(message: &str) {
    eprintln!("\nError: {message}\n");
}
