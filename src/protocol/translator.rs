// ABOUTME: Translates upstream response events into downstream chat stream frames
// ABOUTME: Emits format first, text per delta, citations on completion, end and final last
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::pin::Pin;

use async_stream::stream;
use futures_util::StreamExt;
use tokio_stream::Stream;
use tracing::{debug, error, trace, warn};

use super::citations::{collect_citations, format_citation_suffix};
use super::{CitationMode, CitationsPayload, Frame, MessageFinish, StepFinish};
use crate::llm::{EventStream, UpstreamEvent};

/// Stream of frames for one chat response
pub type FrameStream = Pin<Box<dyn Stream<Item = Frame> + Send>>;

/// Translate an upstream event stream into frames
///
/// Ordering follows arrival: the format frame first, then one text frame per
/// non-empty delta, citations when a completed response carries any, then the
/// end and final frames once upstream finishes normally. A mid-stream failure
/// (transport error or provider failure event) is logged and truncates the
/// stream: no end or final frame is emitted, so clients can tell the reply is
/// incomplete.
#[must_use]
pub fn translate(mut events: EventStream, mode: CitationMode, message_id: String) -> FrameStream {
    Box::pin(stream! {
        debug!(message_id = %message_id, "Starting chat stream");
        yield Frame::format(message_id.clone());

        while let Some(item) = events.next().await {
            match item {
                Ok(UpstreamEvent::TextDelta(delta)) => {
                    if !delta.is_empty() {
                        yield Frame::Text(delta);
                    }
                }
                Ok(UpstreamEvent::Completed(response)) => {
                    let citations = collect_citations(&response);
                    if !citations.is_empty() {
                        debug!(message_id = %message_id, count = citations.len(), "Emitting citations");
                        yield match mode {
                            CitationMode::Frame => Frame::Citations(CitationsPayload { citations }),
                            CitationMode::TextSuffix => Frame::Text(format_citation_suffix(&citations)),
                        };
                    }
                }
                Ok(UpstreamEvent::Failed(message)) => {
                    warn!(message_id = %message_id, error = %message, "Upstream reported failure, truncating stream");
                    return;
                }
                Ok(UpstreamEvent::Other(kind)) => {
                    trace!(event = %kind, "Ignoring upstream event");
                }
                Err(e) => {
                    error!(message_id = %message_id, error = %e, "Upstream stream failed, truncating stream");
                    return;
                }
            }
        }

        yield Frame::End(StepFinish::default());
        yield Frame::Final(MessageFinish::default());
        debug!(message_id = %message_id, "Chat stream complete");
    })
}
