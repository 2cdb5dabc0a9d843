// ABOUTME: Client-side frame decoding and reply accumulation for the chat stream
// ABOUTME: Buffers partial lines across chunks and folds frames into an assistant reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::mem;

use crate::errors::AppResult;
use crate::protocol::citations::{format_citation_suffix, split_citation_suffix};
use crate::protocol::{CitationMode, Frame};

/// Line-buffering decoder for the chat response body
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    /// Create an empty decoder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a body chunk, returning every frame completed by it
    ///
    /// # Errors
    ///
    /// Returns an error if a complete line is not a valid frame
    pub fn feed(&mut self, bytes: &[u8]) -> AppResult<Vec<Frame>> {
        self.buffer.extend_from_slice(bytes);

        let mut frames = Vec::new();
        while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            if let Some(frame) = Frame::decode(&String::from_utf8_lossy(&line))? {
                frames.push(frame);
            }
        }
        Ok(frames)
    }

    /// Decode a trailing line left without a newline when the body ended
    ///
    /// # Errors
    ///
    /// Returns an error if the remainder is not a valid frame
    pub fn finish(&mut self) -> AppResult<Option<Frame>> {
        let remaining = mem::take(&mut self.buffer);
        Frame::decode(&String::from_utf8_lossy(&remaining))
    }
}

/// Assistant reply assembled from a frame stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssistantReply {
    /// Identifier from the format frame
    pub message_id: Option<String>,
    /// Display text; a legacy citation suffix is removed only for suffix-mode streams
    pub text: String,
    /// Cited filenames, in order
    pub citations: Vec<String>,
    /// False when the stream ended without a final frame
    pub complete: bool,
}

impl AssistantReply {
    /// Text to keep in the conversation history
    ///
    /// Citations are re-attached as the `<a|b|c>` suffix so a shared
    /// snapshot still carries its sources.
    #[must_use]
    pub fn history_text(&self) -> String {
        if self.citations.is_empty() {
            self.text.clone()
        } else {
            format!("{}{}", self.text, format_citation_suffix(&self.citations))
        }
    }
}

/// Folds frames into an [`AssistantReply`]
#[derive(Debug, Default)]
pub struct ReplyAccumulator {
    mode: CitationMode,
    message_id: Option<String>,
    text: String,
    citations: Vec<String>,
    saw_citations_frame: bool,
    finished: bool,
}

impl ReplyAccumulator {
    /// Create an empty accumulator for a server using `mode`
    #[must_use]
    pub fn new(mode: CitationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Apply one frame
    pub fn apply(&mut self, frame: Frame) {
        match frame {
            Frame::Format(payload) => self.message_id = Some(payload.message_id),
            Frame::Text(fragment) => self.text.push_str(&fragment),
            Frame::Citations(payload) => {
                self.saw_citations_frame = true;
                for citation in payload.citations {
                    if !self.citations.contains(&citation) {
                        self.citations.push(citation);
                    }
                }
            }
            Frame::End(_) => {}
            Frame::Final(_) => self.finished = true,
        }
    }

    /// Text received so far, suffix included
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.text
    }

    /// Finish the reply
    ///
    /// A `c:` frame always wins. Otherwise a trailing `<a|b|c>` group is
    /// parsed only in [`CitationMode::TextSuffix`]; in frame mode the text
    /// is passed through untouched, angle brackets and all.
    #[must_use]
    pub fn into_reply(self) -> AssistantReply {
        let (text, citations) = if self.saw_citations_frame {
            (self.text.trim().to_owned(), self.citations)
        } else {
            match self.mode {
                CitationMode::TextSuffix => split_citation_suffix(&self.text),
                CitationMode::Frame => (self.text, Vec::new()),
            }
        };

        AssistantReply {
            message_id: self.message_id,
            text,
            citations,
            complete: self.finished,
        }
    }
}
