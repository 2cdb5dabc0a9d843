// ABOUTME: End-to-end tests for the chat client against an in-process server
// ABOUTME: Covers streamed replies, citation modes, interrupted replies, and sharing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    completed_with_citations, init_test_logging, spawn_app, spawn_fake_upstream, test_resources,
    ScriptedProvider, UPSTREAM_SSE_BODY,
};
use pgchat_server::{
    client::ChatClient,
    config::ServerConfig,
    errors::ErrorCode,
    llm::{CompletedResponse, OpenAiResponsesProvider, UpstreamEvent},
    models::{Role, Turn},
    protocol::{citations::split_citation_suffix, CitationMode, Frame},
    resources::ServerResources,
    store::Store,
};

async fn client_for(provider: ScriptedProvider, mode: CitationMode) -> ChatClient {
    let resources = test_resources(Arc::new(provider), mode).await;
    ChatClient::new(spawn_app(resources).await).with_citation_mode(mode)
}

#[tokio::test]
async fn test_reply_through_real_provider() {
    init_test_logging();
    let (upstream_url, _) = spawn_fake_upstream(StatusCode::OK, UPSTREAM_SSE_BODY).await;

    let mut config = ServerConfig::default();
    config.upstream.base_url = upstream_url;
    let provider = Arc::new(OpenAiResponsesProvider::new(&config.upstream).unwrap());
    let resources = Arc::new(ServerResources::new(
        config,
        Store::in_memory().await.unwrap(),
        provider,
    ));
    let client = ChatClient::new(spawn_app(resources).await);

    let reply = client.send(&[Turn::user("hi")]).await.unwrap();

    assert_eq!(reply.text, "Hello world");
    assert_eq!(reply.citations, vec!["essay1.txt", "essay2.txt"]);
    assert!(reply.complete);
    assert!(reply.message_id.unwrap().starts_with("msg-"));
}

#[tokio::test]
async fn test_suffix_citations_are_parsed() {
    let client = client_for(
        ScriptedProvider::streaming(vec![
            Ok(UpstreamEvent::TextDelta("Start small.".to_owned())),
            Ok(completed_with_citations("Start small.", &["startupideas.txt"])),
        ]),
        CitationMode::TextSuffix,
    )
    .await;

    let reply = client.send(&[Turn::user("ideas?")]).await.unwrap();

    assert_eq!(reply.text, "Start small.");
    assert_eq!(reply.citations, vec!["startupideas.txt"]);
    assert!(reply.complete);
}

#[tokio::test]
async fn test_streaming_callback_sees_every_frame() {
    let client = client_for(
        ScriptedProvider::streaming(common::hello_world_script()),
        CitationMode::Frame,
    )
    .await;

    let mut texts = Vec::new();
    let reply = client
        .send_streaming(&[Turn::user("hi")], |frame| {
            if let Frame::Text(text) = frame {
                texts.push(text.clone());
            }
        })
        .await
        .unwrap();

    assert_eq!(texts, vec!["Hello", " world"]);
    assert_eq!(reply.text, "Hello world");
}

#[tokio::test]
async fn test_truncated_stream_marks_reply_incomplete() {
    let client = client_for(
        ScriptedProvider::streaming(vec![
            Ok(UpstreamEvent::TextDelta("Half an ans".to_owned())),
            Ok(UpstreamEvent::Failed("server_error".to_owned())),
        ]),
        CitationMode::Frame,
    )
    .await;

    let reply = client.send(&[Turn::user("hi")]).await.unwrap();

    assert_eq!(reply.text, "Half an ans");
    assert!(!reply.complete);
}

#[tokio::test]
async fn test_upstream_failure_surfaces_error_message() {
    let client = client_for(ScriptedProvider::failing(), CitationMode::Frame).await;

    let err = client.send(&[Turn::user("hi")]).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceError);
    assert_eq!(err.message, "OpenAI: connection refused");
}

#[tokio::test]
async fn test_share_and_fetch_round_trip() {
    let client = client_for(
        ScriptedProvider::streaming(common::hello_world_script()),
        CitationMode::Frame,
    )
    .await;
    let turns = vec![Turn::user("hi"), Turn::assistant("Hello world")];

    let share = client.share(&turns).await.unwrap();
    let loaded = client.fetch_shared(&share.id).await.unwrap().unwrap();

    assert_eq!(loaded.id, share.id);
    assert_eq!(loaded.messages, turns);
    assert_eq!(loaded.messages[1].role, Role::Assistant);
}

#[tokio::test]
async fn test_frame_mode_reply_keeps_angle_brackets() {
    let client = client_for(
        ScriptedProvider::streaming(vec![
            Ok(UpstreamEvent::TextDelta("Use Vec<T>".to_owned())),
            Ok(UpstreamEvent::Completed(CompletedResponse::default())),
        ]),
        CitationMode::Frame,
    )
    .await;

    let reply = client.send(&[Turn::user("which type?")]).await.unwrap();

    assert_eq!(reply.text, "Use Vec<T>");
    assert!(reply.citations.is_empty());
    assert!(reply.complete);
}

#[tokio::test]
async fn test_shared_history_keeps_frame_citations() {
    let client = client_for(
        ScriptedProvider::streaming(vec![
            Ok(UpstreamEvent::TextDelta("Answer".to_owned())),
            Ok(completed_with_citations("Answer", &["a.txt"])),
        ]),
        CitationMode::Frame,
    )
    .await;

    let question = Turn::user("sources?");
    let reply = client.send(std::slice::from_ref(&question)).await.unwrap();
    assert_eq!(reply.citations, vec!["a.txt"]);

    let turns = vec![question, Turn::assistant(reply.history_text())];
    let share = client.share(&turns).await.unwrap();
    let loaded = client.fetch_shared(&share.id).await.unwrap().unwrap();

    let (text, citations) = split_citation_suffix(&loaded.messages[1].content);
    assert_eq!(text, "Answer");
    assert_eq!(citations, vec!["a.txt"]);
}

#[tokio::test]
async fn test_share_validation_error_is_described() {
    let client = client_for(
        ScriptedProvider::streaming(common::hello_world_script()),
        CitationMode::Frame,
    )
    .await;

    let err = client.share(&[]).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(err.message, "No messages to share");
}

#[tokio::test]
async fn test_fetch_unknown_share_is_none() {
    let client = client_for(
        ScriptedProvider::streaming(common::hello_world_script()),
        CitationMode::Frame,
    )
    .await;

    assert!(client.fetch_shared("nope").await.unwrap().is_none());
}
