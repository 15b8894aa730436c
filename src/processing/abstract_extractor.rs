//! Locates and validates the abstract of a paper.
//!
//! Strategies run in order until one yields a candidate:
//! 1. an explicit heading (`Abstract:`, `摘要：`, `【摘要】`, ...)
//! 2. one of the first five long paragraphs that reads like an abstract
//! 3. an excerpt of the first medium-length paragraph

use super::analyzer::{assess_text_quality, count_sentences};
use super::normalizer::{clean_text, format_content, split_paragraphs, ELLIPSIS};
use super::tables::{
    after_newline_matcher, ABSTRACT_HEADINGS, ABSTRACT_VOCABULARY, KEYWORD_SECTION_STARTS,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// Returned by [`extract_abstract`] when no strategy finds an abstract.
pub const ABSTRACT_NOT_FOUND: &str = "No recognizable abstract was found";

const MIN_ABSTRACT_CHARS: usize = 50;
const MAX_ABSTRACT_CHARS: usize = 2000;
const FALLBACK_PARAGRAPH_MIN_CHARS: usize = 100;
const FALLBACK_PARAGRAPHS_INSPECTED: usize = 5;
const EXCERPT_CHARS: usize = 500;

/// Where an abstract candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbstractOrigin {
    Heading,
    Paragraph,
    Excerpt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractCandidate {
    /// Formatted abstract text
    pub text: String,
    pub origin: AbstractOrigin,
    /// Whether the text passed abstract validation; excerpts never do
    pub valid: bool,
    pub quality: u8,
}

impl AbstractCandidate {
    fn new(text: String, origin: AbstractOrigin, valid: bool) -> Self {
        let quality = assess_text_quality(&text).score;
        Self {
            text,
            origin,
            valid,
            quality,
        }
    }
}

struct HeadingMatcher {
    name: &'static str,
    heading: Regex,
    terminator: Regex,
}

static HEADING_MATCHERS: LazyLock<Vec<HeadingMatcher>> = LazyLock::new(|| {
    ABSTRACT_HEADINGS
        .iter()
        .map(|h| HeadingMatcher {
            name: h.name,
            heading: Regex::new(&format!("(?is){}", h.heading)).unwrap(),
            terminator: after_newline_matcher(h.terminators),
        })
        .collect()
});

static KEYWORD_SECTION: LazyLock<Regex> =
    LazyLock::new(|| after_newline_matcher(KEYWORD_SECTION_STARTS));

type Strategy = fn(&str) -> Option<AbstractCandidate>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("heading", from_headings),
    ("paragraph", from_leading_paragraphs),
    ("excerpt", from_medium_paragraph),
];

/// Extracts the abstract of `full_text`, or [`ABSTRACT_NOT_FOUND`].
///
/// Never returns an empty string.
pub fn extract_abstract(full_text: &str) -> String {
    match find_abstract(full_text) {
        Some(candidate) if !candidate.text.is_empty() => candidate.text,
        _ => ABSTRACT_NOT_FOUND.to_string(),
    }
}

/// Runs the strategy chain and returns the first candidate found.
pub fn find_abstract(full_text: &str) -> Option<AbstractCandidate> {
    let text = clean_text(full_text);
    if text.is_empty() {
        return None;
    }

    for (name, strategy) in STRATEGIES {
        if let Some(candidate) = strategy(&text) {
            debug!("Abstract found by {} strategy ({:?})", name, candidate.origin);
            return Some(candidate);
        }
    }

    debug!("No abstract candidate in {} characters of text", text.chars().count());
    None
}

/// True when `text` looks like a research abstract.
pub fn validate_abstract(text: &str) -> bool {
    let trimmed = text.trim();
    let length = trimmed.chars().count();
    if !(MIN_ABSTRACT_CHARS..=MAX_ABSTRACT_CHARS).contains(&length) {
        return false;
    }

    if count_sentences(trimmed) < 2 {
        return false;
    }

    let lowered = trimmed.to_lowercase();
    ABSTRACT_VOCABULARY.iter().any(|term| lowered.contains(term))
}

fn from_headings(text: &str) -> Option<AbstractCandidate> {
    for matcher in HEADING_MATCHERS.iter() {
        for body in heading_bodies(text, matcher) {
            if validate_abstract(body) {
                debug!("Abstract heading pattern '{}' matched", matcher.name);
                return Some(AbstractCandidate::new(
                    format_content(body),
                    AbstractOrigin::Heading,
                    true,
                ));
            }
        }
    }
    None
}

/// Bodies following each occurrence of the heading, in document order.
///
/// A body runs to the earliest terminator or the end of the text, minus any
/// trailing keyword section.
fn heading_bodies<'a>(text: &'a str, matcher: &HeadingMatcher) -> Vec<&'a str> {
    let mut bodies = Vec::new();
    let mut pos = 0;

    while let Some(heading) = matcher.heading.find_at(text, pos) {
        let start = heading.end();
        let end = matcher
            .terminator
            .find_at(text, start)
            .map(|m| m.start())
            .unwrap_or(text.len());

        bodies.push(strip_keyword_section(&text[start..end]));
        pos = end;
    }

    bodies
}

fn strip_keyword_section(body: &str) -> &str {
    match KEYWORD_SECTION.find(body) {
        Some(m) => body[..m.start()].trim(),
        None => body.trim(),
    }
}

fn long_paragraphs(text: &str) -> Vec<&str> {
    split_paragraphs(text)
        .into_iter()
        .filter(|p| p.chars().count() > FALLBACK_PARAGRAPH_MIN_CHARS)
        .collect()
}

fn from_leading_paragraphs(text: &str) -> Option<AbstractCandidate> {
    long_paragraphs(text)
        .into_iter()
        .take(FALLBACK_PARAGRAPHS_INSPECTED)
        .find(|p| validate_abstract(p))
        .map(|p| AbstractCandidate::new(format_content(p), AbstractOrigin::Paragraph, true))
}

fn from_medium_paragraph(text: &str) -> Option<AbstractCandidate> {
    let paragraph = long_paragraphs(text).into_iter().find(|p| {
        let length = p.chars().count();
        length > 200 && length < 1000
    })?;

    let head: String = paragraph.chars().take(EXCERPT_CHARS).collect();
    let excerpt = format!("{}{}", format_content(&head), ELLIPSIS);
    Some(AbstractCandidate::new(excerpt, AbstractOrigin::Excerpt, false))
}
