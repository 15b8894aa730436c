//! Text hygiene for PDF-extracted content.
//!
//! `clean_text` produces the canonical form every other stage works on;
//! `format_content` additionally strips extraction noise and caps the length
//! of a displayable block.

use super::tables::is_sentence_terminator;
use regex::Regex;
use std::sync::LazyLock;

/// Upper bound, in characters, of any formatted block before its ellipsis.
pub const MAX_CONTENT_CHARS: usize = 1500;

/// Marker appended when a block is cut away from a sentence boundary.
pub const ELLIPSIS: &str = "...";

static BLANK_LINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

static PAGE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:第\s*\d+\s*页|page\s*\d+)$").unwrap());

static CJK_TERMINATOR_GLUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([。！？])([^"\s])"#).unwrap());

static LATIN_TERMINATOR_GLUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])([A-Z])").unwrap());

static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-•][ \t]*").unwrap());

static NUMBERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(\d+)\.[ \t]*([^\d\s])").unwrap());

static CJK_PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([。！？])\s*([A-Z\x{4e00}-\x{9fff}])").unwrap());

static CJK_PUNCT_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([，。！？；：])[ \t]+").unwrap());

static LATIN_PUNCT_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([,;:!?])[ \t]*([^\s\d[:punct:]])").unwrap());

/// Normalizes raw extracted text into canonical form.
///
/// Line endings become `\n`, control characters are dropped, horizontal
/// whitespace runs shrink to one space, every line is trimmed and at most one
/// blank line separates paragraphs. Applying it twice changes nothing.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = unified.split('\n').map(clean_line).collect();
    let joined = lines.join("\n");

    BLANK_LINE_RUN.replace_all(&joined, "\n\n").trim().to_string()
}

fn clean_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending_space = false;

    for ch in line.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if ch.is_control() {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }

    out
}

/// Splits on blank lines; paragraphs come back trimmed and non-empty.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Prepares a block of text for display.
pub fn format_content(content: &str) -> String {
    let cleaned = clean_text(content);
    if cleaned.is_empty() {
        return cleaned;
    }

    let denoised = remove_common_noise(&cleaned);
    let paragraphs = normalize_paragraphs(&denoised);
    let punctuated = normalize_punctuation(&paragraphs);

    truncate_content(punctuated.trim(), MAX_CONTENT_CHARS)
}

/// Drops page furniture left behind by PDF extraction.
fn remove_common_noise(text: &str) -> String {
    let lines: Vec<String> = text
        .split('\n')
        .map(|line| {
            if is_noise_line(line) {
                String::new()
            } else {
                collapse_symbol_runs(line)
            }
        })
        .collect();

    BLANK_LINE_RUN
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

fn is_noise_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }

    // Covers lone punctuation and stray glyphs as well.
    if trimmed.chars().count() <= 3 {
        return true;
    }

    trimmed.chars().all(|c| c.is_ascii_digit()) || PAGE_HEADER.is_match(trimmed)
}

/// Shrinks runs of four or more identical symbols ("-----", "....") to one.
fn collapse_symbol_runs(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == ch {
            run += 1;
        }

        let is_symbol = !(ch.is_alphanumeric() || ch == '_' || ch.is_whitespace());
        if is_symbol && run >= 4 {
            out.push(ch);
        } else {
            out.extend(std::iter::repeat(ch).take(run));
        }
        i += run;
    }

    out
}

fn normalize_paragraphs(text: &str) -> String {
    let text = CJK_TERMINATOR_GLUE.replace_all(text, "$1 $2");
    let text = LATIN_TERMINATOR_GLUE.replace_all(&text, "$1 $2");
    let text = BULLET_MARKER.replace_all(&text, "• ");
    let text = NUMBERED_MARKER.replace_all(&text, "${1}. ${2}");
    CJK_PARAGRAPH_BREAK
        .replace_all(&text, "$1\n\n$2")
        .into_owned()
}

fn normalize_punctuation(text: &str) -> String {
    let text = CJK_PUNCT_SPACING.replace_all(text, "$1");
    LATIN_PUNCT_SPACING
        .replace_all(&text, "$1 $2")
        .into_owned()
}

/// Cuts `content` to at most `max_chars` characters.
///
/// A cut on a sentence terminator past 80% of the limit is kept as is; failing
/// that, a comma or space past 90% is used; otherwise the text is hard-cut.
/// Both of the latter get an ellipsis.
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= max_chars {
        return content.to_string();
    }

    let truncated = &chars[..max_chars];

    if let Some(end) = truncated.iter().rposition(|c| is_sentence_terminator(*c)) {
        if end * 10 > max_chars * 8 {
            return truncated[..=end].iter().collect();
        }
    }

    if let Some(cut) = truncated.iter().rposition(|c| matches!(c, '，' | ',' | ' ')) {
        if cut * 10 > max_chars * 9 {
            let head: String = truncated[..cut].iter().collect();
            return format!("{}{}", head, ELLIPSIS);
        }
    }

    let head: String = truncated.iter().collect();
    format!("{}{}", head, ELLIPSIS)
}
