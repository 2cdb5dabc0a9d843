// ABOUTME: Interactive chat session for pgchat-cli
// ABOUTME: Reads prompts from stdin, streams replies, and shares the running conversation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io::{self, Write};

use pgchat_server::client::{render_reply, ChatClient};
use pgchat_server::errors::AppResult;
use pgchat_server::models::Turn;
use pgchat_server::protocol::citations::is_citation_suffix;
use pgchat_server::protocol::{CitationMode, Frame};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::helpers::display::{
    display_banner, display_citations, display_error, display_reply, display_share,
};

enum Input<'a> {
    Message(&'a str),
    Share,
    Reset,
    Quit,
    Empty,
}

fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        "" => Input::Empty,
        "/share" => Input::Share,
        "/reset" => Input::Reset,
        "/quit" | "/exit" => Input::Quit,
        message => Input::Message(message),
    }
}

/// Run the interactive session until `/quit` or end of input
pub async fn run(client: &ChatClient, template: &str, stream: bool) -> AppResult<()> {
    display_banner(client.base_url());

    let mut turns: Vec<Turn> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Reset => {
                turns.clear();
                println!("Conversation cleared.");
            }
            Input::Share => share(client, &turns).await,
            Input::Message(message) => {
                turns.push(Turn::user(message));
                if let Some(reply) = ask(client, &turns, template, stream).await {
                    turns.push(Turn::assistant(reply));
                } else {
                    turns.pop();
                }
            }
        }
    }

    Ok(())
}

/// Send the conversation; returns the assistant text to keep in history
async fn ask(client: &ChatClient, turns: &[Turn], template: &str, stream: bool) -> Option<String> {
    let result = if stream {
        println!();
        print!("  ");
        // In suffix mode the last text frame is held back so the <a|b> group is never echoed raw
        let hold_back = client.citation_mode() == CitationMode::TextSuffix;
        let mut held: Option<String> = None;
        let result = client
            .send_streaming(turns, |frame| {
                if let Frame::Text(text) = frame {
                    let ready = if hold_back {
                        held.replace(text.clone())
                    } else {
                        Some(text.clone())
                    };
                    if let Some(ready) = ready {
                        print!("{ready}");
                        flush();
                    }
                }
            })
            .await;
        if let Some(last) = held.filter(|text| !is_citation_suffix(text)) {
            print!("{last}");
        }
        println!();
        result
    } else {
        client.send(turns).await
    };

    match result {
        Ok(reply) => {
            if stream {
                display_citations(&render_reply("", &reply.citations, template));
                if !reply.complete {
                    println!("\n  [reply interrupted]");
                }
                println!();
            } else {
                display_reply(&reply, template);
            }
            Some(reply.history_text()).filter(|text| !text.is_empty())
        }
        Err(e) => {
            warn!(error = %e, "Chat request failed");
            display_error(&e.message);
            None
        }
    }
}

async fn share(client: &ChatClient, turns: &[Turn]) {
    if turns.is_empty() {
        println!("Nothing to share yet.");
        return;
    }
    match client.share(turns).await {
        Ok(share) => display_share(client.base_url(), &share),
        Err(e) => display_error(&e.message),
    }
}

fn prompt() {
    print!("You: ");
    flush();
}

fn flush() {
    if let Err(e) = io::stdout().flush() {
        warn!(error = %e, "Failed to flush stdout");
    }
}
