// ABOUTME: Integration tests for citation collection, suffix parsing, and link building
// ABOUTME: Exercises the legacy <a|b> suffix convention and essay URL templates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use pgchat_server::{
    client::{render_reply, CitationLink},
    constants::protocol::DEFAULT_CITATION_LINK_TEMPLATE,
    llm::{Annotation, CompletedResponse, OutputItem},
    protocol::citations::{
        citation_link, collect_citations, format_citation_suffix, split_citation_suffix,
    },
};

#[test]
fn test_split_suffix_from_reply() {
    let (text, citations) = split_citation_suffix("Hello\n\nWorld<essay1|essay2>");

    assert_eq!(text, "Hello\n\nWorld");
    assert_eq!(citations, vec!["essay1", "essay2"]);
}

#[test]
fn test_split_without_suffix_is_unchanged() {
    let (text, citations) = split_citation_suffix("No sources <here> in the middle.");

    assert_eq!(text, "No sources <here> in the middle.");
    assert!(citations.is_empty());
}

#[test]
fn test_formatted_suffix_parses_back() {
    let names = vec!["how-to-start.txt".to_owned(), "greatwork.txt".to_owned()];
    let text = format!("Start small.{}", format_citation_suffix(&names));

    let (display, citations) = split_citation_suffix(&text);
    assert_eq!(display, "Start small.");
    assert_eq!(citations, names);
}

#[test]
fn test_collect_ignores_non_message_items_and_other_annotations() {
    let response = CompletedResponse {
        id: None,
        output: vec![
            OutputItem {
                kind: "file_search_call".to_owned(),
                content: Vec::new(),
            },
            OutputItem::message(
                "text",
                vec![
                    Annotation {
                        kind: "url_citation".to_owned(),
                        filename: Some("ignored.txt".to_owned()),
                        file_id: None,
                    },
                    Annotation::file_citation("b.txt"),
                    Annotation::file_citation("a.txt"),
                    Annotation::file_citation("b.txt"),
                ],
            ),
        ],
    };

    assert_eq!(collect_citations(&response), vec!["b.txt", "a.txt"]);
}

#[test]
fn test_citation_link_strips_txt() {
    assert_eq!(
        citation_link("greatwork.txt", DEFAULT_CITATION_LINK_TEMPLATE),
        "https://paulgraham.com/greatwork.html"
    );
    assert_eq!(
        citation_link("ds", "https://example.com/essays/{name}"),
        "https://example.com/essays/ds"
    );
}

#[test]
fn test_render_reply_bubbles_and_links() {
    let rendered = render_reply(
        "First point.\n\nSecond point.\n\n",
        &["greatwork.txt".to_owned()],
        DEFAULT_CITATION_LINK_TEMPLATE,
    );

    assert_eq!(rendered.bubbles, vec!["First point.", "Second point."]);
    assert_eq!(
        rendered.citations,
        vec![CitationLink {
            filename: "greatwork.txt".to_owned(),
            url: "https://paulgraham.com/greatwork.html".to_owned(),
        }]
    );
}
