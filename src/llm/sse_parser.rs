// ABOUTME: Line-buffering Server-Sent Events parser for the upstream response stream
// ABOUTME: Handles partial lines across TCP boundaries and multiple events per chunk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # SSE Stream Parser
//!
//! Network chunks and SSE event boundaries never line up. This parser solves
//! two correctness issues:
//!
//! 1. **Multiple events per TCP chunk**: every `data:` line in a chunk is emitted.
//! 2. **Partial JSON across TCP boundaries**: incomplete lines stay buffered
//!    until their terminating newline arrives.
//!
//! The caller supplies a `parse_data` closure turning one JSON payload into a
//! typed item; SSE framing (`data:` prefix stripping, `[DONE]` detection,
//! ignoring `event:`/`id:`/comment lines) is handled once here.

use std::collections::VecDeque;
use std::fmt::Display;
use std::mem;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::stream::unfold;
use futures_util::{Stream, StreamExt};

use crate::errors::{AppError, AppResult};

/// A parsed SSE event from the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A `data:` payload (prefix stripped)
    Data(String),
    /// The `[DONE]` termination signal
    Done,
}

/// Line-buffering SSE parser that handles partial lines across chunk boundaries
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    buffer: Vec<u8>,
}

impl SseLineBuffer {
    /// Create a new empty line buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes into the buffer, returning any complete SSE events
    ///
    /// Lines are decoded only once complete, so multi-byte characters split
    /// across chunks survive intact.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            if let Some(event) = parse_line(&String::from_utf8_lossy(&line)) {
                events.push(event);
            }
        }
        events
    }

    /// Parse whatever remains once the byte stream has ended
    pub fn flush(&mut self) -> Vec<SseEvent> {
        let remaining = mem::take(&mut self.buffer);
        parse_line(&String::from_utf8_lossy(&remaining))
            .into_iter()
            .collect()
    }
}

fn parse_line(line: &str) -> Option<SseEvent> {
    let trimmed = line.trim();
    let data = trimmed.strip_prefix("data:")?;
    let data = data.strip_prefix(' ').unwrap_or(data);

    if data.trim() == "[DONE]" {
        return Some(SseEvent::Done);
    }
    if data.trim().is_empty() {
        return None;
    }
    Some(SseEvent::Data(data.to_owned()))
}

/// Boxed stream of parsed items
pub type ParsedStream<T> = Pin<Box<dyn Stream<Item = AppResult<T>> + Send>>;

/// Create a properly-buffered SSE stream from a raw byte stream
///
/// `parse_data` returns `None` to skip a payload. A transport error is yielded
/// once as an `Err` item and ends the stream; `[DONE]` ends it silently.
pub fn create_sse_stream<S, E, F, T>(
    byte_stream: S,
    parse_data: F,
    provider_name: &'static str,
) -> ParsedStream<T>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
    F: Fn(&str) -> Option<AppResult<T>> + Send + 'static,
    T: Send + 'static,
{
    let state = SseStreamState {
        bytes: Box::pin(byte_stream),
        parser: SseLineBuffer::new(),
        pending: VecDeque::new(),
        ended: false,
        parse_data,
        provider_name,
    };

    Box::pin(unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.ended {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let events = state.parser.feed(&chunk);
                    state.enqueue(events);
                }
                Some(Err(e)) => {
                    state.ended = true;
                    let error = AppError::external_service(
                        state.provider_name,
                        format!("Stream read error: {e}"),
                    );
                    return Some((Err(error), state));
                }
                None => {
                    state.ended = true;
                    let events = state.parser.flush();
                    state.enqueue(events);
                }
            }
        }
    }))
}

type ByteStream<E> = Pin<Box<dyn Stream<Item = Result<Bytes, E>> + Send>>;

struct SseStreamState<E, F, T> {
    bytes: ByteStream<E>,
    parser: SseLineBuffer,
    pending: VecDeque<AppResult<T>>,
    ended: bool,
    parse_data: F,
    provider_name: &'static str,
}

impl<E, F, T> SseStreamState<E, F, T>
where
    F: Fn(&str) -> Option<AppResult<T>>,
{
    fn enqueue(&mut self, events: Vec<SseEvent>) {
        for event in events {
            match event {
                SseEvent::Data(json) => {
                    if let Some(item) = (self.parse_data)(&json) {
                        self.pending.push_back(item);
                    }
                }
                SseEvent::Done => {
                    self.ended = true;
                    return;
                }
            }
        }
    }
}
