// ABOUTME: Upstream model provider defaults for the streaming responses API
// ABOUTME: Model name, base URL, timeouts, and request shaping constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Path of the create-response operation under the base URL
pub const RESPONSES_PATH: &str = "responses";

/// Input sent when a conversation has no user or assistant turns
pub const FALLBACK_INPUT: &str = "Hello";

/// Connect timeout for the upstream HTTP client
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Provider name used in logs and error messages
pub const PROVIDER_NAME: &str = "OpenAI";

/// Annotation kind carrying a retrieval citation
pub const FILE_CITATION: &str = "file_citation";

/// Output item kind carrying assistant text
pub const MESSAGE_OUTPUT: &str = "message";
