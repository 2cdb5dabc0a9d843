// ABOUTME: Retrieval citation collection and the legacy trailing-suffix text convention
// ABOUTME: Collects ordered unique filenames and parses or formats the <a|b|c> suffix
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::constants::upstream::{FILE_CITATION, MESSAGE_OUTPUT};
use crate::llm::CompletedResponse;

/// Collect cited filenames from a completed response
///
/// Walks `message` output items, their content parts, and their
/// `file_citation` annotations. Order is first occurrence; duplicates are dropped.
#[must_use]
pub fn collect_citations(response: &CompletedResponse) -> Vec<String> {
    let mut seen = HashSet::new();
    response
        .output
        .iter()
        .filter(|item| item.kind == MESSAGE_OUTPUT)
        .flat_map(|item| item.content.iter())
        .flat_map(|part| part.annotations.iter())
        .filter(|annotation| annotation.kind == FILE_CITATION)
        .filter_map(|annotation| annotation.filename.as_deref())
        .filter(|filename| seen.insert(*filename))
        .map(ToOwned::to_owned)
        .collect()
}

/// Format the legacy suffix: blank line, then `<a|b|c>`
#[must_use]
pub fn format_citation_suffix(filenames: &[String]) -> String {
    format!("\n\n<{}>", filenames.join("|"))
}

fn suffix_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"<([^>]+)>$").ok())
        .as_ref()
}

/// Split a trailing `<a|b|c>` group off assistant text
///
/// Returns the trimmed display text and the filenames. Names are kept
/// exactly as written between the `|` separators, blanks included. Text
/// without a trailing group is returned unchanged with no citations.
#[must_use]
pub fn split_citation_suffix(text: &str) -> (String, Vec<String>) {
    let Some(captures) = suffix_pattern().and_then(|pattern| pattern.captures(text)) else {
        return (text.to_owned(), Vec::new());
    };
    let (Some(whole), Some(group)) = (captures.get(0), captures.get(1)) else {
        return (text.to_owned(), Vec::new());
    };

    let filenames = group
        .as_str()
        .split('|')
        .map(ToOwned::to_owned)
        .collect();
    (text[..whole.start()].trim().to_owned(), filenames)
}

/// Whether a text fragment is exactly a legacy suffix as emitted by the server
#[must_use]
pub fn is_citation_suffix(fragment: &str) -> bool {
    fragment
        .strip_prefix("\n\n")
        .and_then(|rest| suffix_pattern().and_then(|pattern| pattern.find(rest)))
        .is_some_and(|found| found.start() == 0)
}

/// Build the essay link for a cited filename
///
/// A `.txt` extension is removed and the result substituted for `{name}` in the template.
#[must_use]
pub fn citation_link(filename: &str, template: &str) -> String {
    let name = filename.strip_suffix(".txt").unwrap_or(filename);
    template.replace("{name}", name)
}
