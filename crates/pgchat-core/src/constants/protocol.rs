// ABOUTME: Downstream chunk protocol constants: line tags and finish metadata
// ABOUTME: Shared by the server-side stream translator and the client-side frame decoder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Format frame tag, carries the message identifier
pub const TAG_FORMAT: char = 'f';
/// Data frame tag, carries one JSON-encoded text fragment
pub const TAG_TEXT: char = '0';
/// Citation frame tag, carries the ordered filename list
pub const TAG_CITATIONS: char = 'c';
/// End-of-step frame tag
pub const TAG_END: char = 'e';
/// Final frame tag
pub const TAG_FINAL: char = 'd';

/// Finish reason reported on a normally completed stream
pub const FINISH_REASON_STOP: &str = "stop";

/// Prefix of generated message identifiers
pub const MESSAGE_ID_PREFIX: &str = "msg";
/// Length of the random base36 suffix of message identifiers
pub const MESSAGE_ID_SUFFIX_LEN: usize = 8;

/// Content type of the chat stream response
pub const STREAM_CONTENT_TYPE: &str = "text/event-stream";
/// Header advertising the data stream protocol version
pub const STREAM_PROTOCOL_HEADER: &str = "x-vercel-ai-data-stream";
/// Data stream protocol version
pub const STREAM_PROTOCOL_VERSION: &str = "v1";

/// Default essay link template for rendered citations
pub const DEFAULT_CITATION_LINK_TEMPLATE: &str = "https://paulgraham.com/{name}.html";
