// ABOUTME: PG Chat CLI - terminal chat client for a running chat server
// ABOUTME: Interactive conversation with streamed replies, sharing, and shared-chat viewing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Start an interactive conversation
//! pgchat-cli chat
//!
//! # Print reply text as it streams in
//! pgchat-cli chat --stream
//!
//! # Show a shared conversation
//! pgchat-cli show 3k9x-2mzq8w1e7ab0
//!
//! # Talk to another server
//! pgchat-cli --server http://chat.internal:8080 chat
//! ```

mod commands;
mod helpers;

use clap::{Parser, Subcommand};
use pgchat_server::{
    client::ChatClient, config::environment::citation_link_template, errors::AppResult, logging,
    protocol::CitationMode,
};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "pgchat-cli",
    about = "PG Chat terminal client",
    long_about = "Chat with the essay assistant from the terminal, share conversations, and read shared ones."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Chat server base URL
    #[arg(
        long,
        global = true,
        env = "PGCHAT_SERVER_URL",
        default_value = "http://localhost:8080"
    )]
    server: String,

    /// How the server delivers citations: frame or suffix
    #[arg(long, global = true, env = "CITATION_MODE", default_value = "frame")]
    citation_mode: CitationMode,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Start an interactive conversation
    Chat {
        /// Print reply text as it arrives instead of after completion
        #[arg(long)]
        stream: bool,
    },

    /// Show a shared conversation
    Show {
        /// Share identifier or share URL
        id: String,
    },
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();
    logging::LoggingConfig::for_cli(cli.verbose).init()?;

    let client = ChatClient::new(cli.server).with_citation_mode(cli.citation_mode);
    let template = citation_link_template();
    debug!(server = client.base_url(), "PG Chat CLI");

    match cli.command {
        Command::Chat { stream } => commands::chat::run(&client, &template, stream).await,
        Command::Show { id } => commands::show::run(&client, &template, &id).await,
    }
}
