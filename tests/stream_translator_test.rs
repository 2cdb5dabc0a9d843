// ABOUTME: Integration tests for upstream event to chat frame translation
// ABOUTME: Covers frame ordering, empty deltas, citation delivery modes, and truncation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{completed_with_citations, hello_world_script};
use futures_util::{stream, StreamExt};
use pgchat_server::{
    errors::{AppError, AppResult},
    llm::UpstreamEvent,
    protocol::{
        citations::is_citation_suffix, translate, CitationMode, CitationsPayload, Frame,
        MessageFinish, StepFinish,
    },
};

async fn run(events: Vec<AppResult<UpstreamEvent>>, mode: CitationMode) -> Vec<Frame> {
    translate(Box::pin(stream::iter(events)), mode, "msg-test".to_owned())
        .collect()
        .await
}

// ============================================================================
// Ordering
// ============================================================================

#[tokio::test]
async fn test_plain_reply_frame_sequence() {
    let frames = run(hello_world_script(), CitationMode::Frame).await;

    assert_eq!(
        frames,
        vec![
            Frame::format("msg-test"),
            Frame::Text("Hello".to_owned()),
            Frame::Text(" world".to_owned()),
            Frame::End(StepFinish::default()),
            Frame::Final(MessageFinish::default()),
        ]
    );
}

#[tokio::test]
async fn test_plain_reply_wire_lines() {
    let lines: Vec<String> = run(hello_world_script(), CitationMode::Frame)
        .await
        .iter()
        .map(Frame::to_line)
        .collect();

    assert_eq!(lines[0], "f:{\"messageId\":\"msg-test\"}\n");
    assert_eq!(lines[1], "0:\"Hello\"\n");
    assert_eq!(lines[2], "0:\" world\"\n");
    assert_eq!(
        lines[3],
        "e:{\"finishReason\":\"stop\",\"usage\":{\"promptTokens\":0,\"completionTokens\":0},\"isContinued\":false}\n"
    );
    assert_eq!(
        lines[4],
        "d:{\"finishReason\":\"stop\",\"usage\":{\"promptTokens\":0,\"completionTokens\":0}}\n"
    );
}

#[tokio::test]
async fn test_empty_upstream_still_terminates() {
    let frames = run(Vec::new(), CitationMode::Frame).await;

    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], Frame::format("msg-test"));
    assert!(matches!(frames[1], Frame::End(_)));
    assert!(matches!(frames[2], Frame::Final(_)));
}

#[tokio::test]
async fn test_empty_deltas_are_skipped() {
    let events = vec![
        Ok(UpstreamEvent::TextDelta(String::new())),
        Ok(UpstreamEvent::TextDelta("a".to_owned())),
        Ok(UpstreamEvent::TextDelta(String::new())),
    ];
    let frames = run(events, CitationMode::Frame).await;

    let texts: Vec<&Frame> = frames
        .iter()
        .filter(|frame| matches!(frame, Frame::Text(_)))
        .collect();
    assert_eq!(texts, vec![&Frame::Text("a".to_owned())]);
}

#[tokio::test]
async fn test_text_with_quotes_and_newlines_is_escaped() {
    let events = vec![Ok(UpstreamEvent::TextDelta("say \"hi\"\nnow".to_owned()))];
    let frames = run(events, CitationMode::Frame).await;

    assert_eq!(frames[1].encode(), r#"0:"say \"hi\"\nnow""#);
}

// ============================================================================
// Citations
// ============================================================================

#[tokio::test]
async fn test_citations_frame_is_deduplicated_and_ordered() {
    let events = vec![
        Ok(UpstreamEvent::TextDelta("Answer".to_owned())),
        Ok(completed_with_citations(
            "Answer",
            &["essay1.txt", "essay2.txt", "essay1.txt"],
        )),
    ];
    let frames = run(events, CitationMode::Frame).await;

    assert_eq!(
        frames[2],
        Frame::Citations(CitationsPayload {
            citations: vec!["essay1.txt".to_owned(), "essay2.txt".to_owned()],
        })
    );
    assert_eq!(
        frames[2].encode(),
        r#"c:{"citations":["essay1.txt","essay2.txt"]}"#
    );
    assert!(matches!(frames[3], Frame::End(_)));
    assert!(matches!(frames[4], Frame::Final(_)));
}

#[tokio::test]
async fn test_suffix_mode_appends_text_frame() {
    let events = vec![
        Ok(UpstreamEvent::TextDelta("Answer".to_owned())),
        Ok(completed_with_citations("Answer", &["essay1", "essay2"])),
    ];
    let frames = run(events, CitationMode::TextSuffix).await;

    assert_eq!(frames[2], Frame::Text("\n\n<essay1|essay2>".to_owned()));
    assert!(!frames.iter().any(|frame| matches!(frame, Frame::Citations(_))));
}

#[tokio::test]
async fn test_suffix_frame_is_distinguishable_from_reply_text() {
    let events = vec![
        Ok(UpstreamEvent::TextDelta("Use Vec<T>".to_owned())),
        Ok(completed_with_citations("Use Vec<T>", &["essay1"])),
    ];
    let frames = run(events, CitationMode::TextSuffix).await;

    let texts: Vec<&str> = frames
        .iter()
        .filter_map(|frame| match frame {
            Frame::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts.len(), 2);
    assert!(!is_citation_suffix(texts[0]));
    assert!(is_citation_suffix(texts[1]));
}

#[tokio::test]
async fn test_no_citations_no_citation_frame() {
    let frames = run(hello_world_script(), CitationMode::TextSuffix).await;

    assert_eq!(frames.len(), 5);
    assert!(!frames.iter().any(|frame| matches!(frame, Frame::Citations(_))));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_transport_error_truncates_stream() {
    let events = vec![
        Ok(UpstreamEvent::TextDelta("partial".to_owned())),
        Err(AppError::external_service("OpenAI", "Stream read error")),
        Ok(UpstreamEvent::TextDelta("never".to_owned())),
    ];
    let frames = run(events, CitationMode::Frame).await;

    assert_eq!(
        frames,
        vec![Frame::format("msg-test"), Frame::Text("partial".to_owned())]
    );
}

#[tokio::test]
async fn test_failed_event_truncates_stream() {
    let events = vec![
        Ok(UpstreamEvent::TextDelta("partial".to_owned())),
        Ok(UpstreamEvent::Failed("server_error".to_owned())),
    ];
    let frames = run(events, CitationMode::Frame).await;

    assert_eq!(frames.len(), 2);
    assert!(!frames.iter().any(|frame| matches!(frame, Frame::Final(_))));
}
