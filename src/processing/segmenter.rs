//! Splits the body of a paper into a fixed number of display segments.

use super::abstract_extractor::ABSTRACT_NOT_FOUND;
use super::normalizer::{
    clean_text, format_content, split_paragraphs, truncate_content, ELLIPSIS, MAX_CONTENT_CHARS,
};
use super::tables::{is_sentence_terminator, line_start_matcher, Section, SECTION_MARKERS};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Number of segments every document is split into.
pub const SEGMENT_COUNT: usize = 8;

/// Characters of the abstract used to locate it in the full text.
const ABSTRACT_PROBE_CHARS: usize = 100;
const MIN_SPAN_CHARS: usize = 100;
const MIN_PACKED_PARAGRAPH_CHARS: usize = 50;
const MIN_SPLITTABLE_CHARS: usize = 200;
const MIN_STRUCTURED_SEGMENTS: usize = 3;
const MIN_NORMALIZABLE_SEGMENTS: usize = 4;

static SECTION_MATCHERS: LazyLock<Vec<(Section, Regex)>> = LazyLock::new(|| {
    SECTION_MARKERS
        .iter()
        .map(|m| (m.section, line_start_matcher(m.forms)))
        .collect()
});

/// Splits `full_text` minus its abstract into exactly [`SEGMENT_COUNT`] segments.
///
/// Structured spans are used when enough section headings are found, packed
/// paragraphs otherwise; short or unstructured documents are sliced evenly.
/// Missing segments are empty strings.
pub fn segment_content(full_text: &str, abstract_text: &str) -> Vec<String> {
    let remaining = remove_abstract(full_text, abstract_text);

    let structured = segment_by_structure(&remaining);
    if structured.len() >= MIN_NORMALIZABLE_SEGMENTS {
        debug!("Normalizing {} structured segments", structured.len());
        return normalize_segments(structured, SEGMENT_COUNT);
    }

    debug!(
        "Only {} structured segments, slicing evenly",
        structured.len()
    );
    segment_evenly(&remaining, SEGMENT_COUNT)
}

/// Excises the abstract from `text`.
///
/// The abstract is located by its first characters, compared lower-cased; if
/// reformatting changed its whitespace the comparison is repeated with all
/// whitespace ignored. The text is returned unchanged when neither matches.
fn remove_abstract(text: &str, abstract_text: &str) -> String {
    let abstract_text = abstract_text.trim();
    if abstract_text.is_empty() || abstract_text == ABSTRACT_NOT_FOUND {
        return text.to_string();
    }

    let haystack: Vec<char> = text.chars().map(fold_case).collect();
    let folded: Vec<char> = abstract_text.chars().map(fold_case).collect();
    let probe = &folded[..folded.len().min(ABSTRACT_PROBE_CHARS)];

    if let Some(start) = find_chars(&haystack, probe) {
        let end = (start + folded.len()).min(haystack.len());
        return excise(text, start, end);
    }

    // Whitespace-insensitive retry; positions map back into `text`.
    let squeezed_text: Vec<(usize, char)> = haystack
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .collect();
    let body = abstract_text.strip_suffix(ELLIPSIS).unwrap_or(abstract_text);
    let squeezed_abstract: Vec<char> = body
        .chars()
        .map(fold_case)
        .filter(|c| !c.is_whitespace())
        .collect();
    if squeezed_abstract.is_empty() {
        return text.to_string();
    }

    let letters: Vec<char> = squeezed_text.iter().map(|(_, c)| *c).collect();
    let probe = &squeezed_abstract[..squeezed_abstract.len().min(ABSTRACT_PROBE_CHARS)];
    match find_chars(&letters, probe) {
        Some(k) => {
            let last = (k + squeezed_abstract.len() - 1).min(letters.len() - 1);
            excise(text, squeezed_text[k].0, squeezed_text[last].0 + 1)
        }
        None => {
            debug!("Abstract not located in text, keeping it in the segments");
            text.to_string()
        }
    }
}

/// Single-character lower-casing so indices stay aligned with the source.
fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Removes the characters in `start..end` (character indices).
fn excise(text: &str, start: usize, end: usize) -> String {
    text.chars()
        .enumerate()
        .filter(|(i, _)| *i < start || *i >= end)
        .map(|(_, c)| c)
        .collect()
}

/// Cuts the text at the first occurrence of each section heading.
///
/// Falls back to paragraph packing when fewer than three spans survive.
fn segment_by_structure(text: &str) -> Vec<String> {
    let mut positions: Vec<usize> = SECTION_MATCHERS
        .iter()
        .filter_map(|(section, re)| {
            let m = re.captures(text)?.name("marker")?;
            debug!("Section {} found at byte {}", section.as_str(), m.start());
            Some(m.start())
        })
        .collect();
    positions.sort_unstable();
    positions.dedup();

    let mut segments = Vec::new();
    for (i, &position) in positions.iter().enumerate() {
        let start = if i == 0 { 0 } else { position };
        let end = positions.get(i + 1).copied().unwrap_or(text.len());
        let span = text[start..end].trim();
        if span.chars().count() > MIN_SPAN_CHARS {
            segments.push(format_content(span));
        }
    }

    if segments.len() < MIN_STRUCTURED_SEGMENTS {
        return segment_by_paragraphs(text);
    }
    segments
}

/// Greedily packs blank-line paragraphs into segments of about an eighth of
/// the text each.
fn segment_by_paragraphs(text: &str) -> Vec<String> {
    let target = text.chars().count() / SEGMENT_COUNT;
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for paragraph in split_paragraphs(text) {
        let length = paragraph.chars().count();
        if length <= MIN_PACKED_PARAGRAPH_CHARS {
            continue;
        }

        if current_len + length > target && current_len > MIN_SPAN_CHARS {
            segments.push(format_content(current.trim()));
            current = paragraph.to_string();
            current_len = length;
        } else {
            if !current.is_empty() {
                current.push_str("\n\n");
                current_len += 2;
            }
            current.push_str(paragraph);
            current_len += length;
        }
    }

    if current.trim().chars().count() > MIN_SPAN_CHARS {
        segments.push(format_content(current.trim()));
    }

    segments
}

/// Brings `segments` to exactly `target` entries.
///
/// Surplus segments are merged into the last slot. Missing ones come from
/// halving the longest segment; once nothing is long enough to split, empty
/// placeholders are appended.
fn normalize_segments(mut segments: Vec<String>, target: usize) -> Vec<String> {
    if segments.len() > target {
        let rest = segments.split_off(target - 1).join("\n\n");
        segments.push(truncate_content(&rest, MAX_CONTENT_CHARS));
        return segments;
    }

    while segments.len() < target {
        let longest = segments
            .iter()
            .enumerate()
            .fold((0, 0), |best, (i, s)| {
                let length = s.chars().count();
                if length > best.1 {
                    (i, length)
                } else {
                    best
                }
            });

        if longest.1 <= MIN_SPLITTABLE_CHARS {
            segments.push(String::new());
            continue;
        }

        let (first, second) = split_in_half(&segments[longest.0]);
        segments[longest.0] = first;
        segments.push(second);
    }

    segments.truncate(target);
    segments
}

/// Splits after the first `。`, else the first `.`, at or past the midpoint.
fn split_in_half(segment: &str) -> (String, String) {
    let chars: Vec<char> = segment.chars().collect();
    let mid = chars.len() / 2;

    let split = ['。', '.']
        .iter()
        .find_map(|t| chars[mid..].iter().position(|c| c == t))
        .map(|offset| mid + offset + 1)
        .unwrap_or(mid);

    let first: String = chars[..split].iter().collect();
    let second: String = chars[split..].iter().collect();
    (first.trim().to_string(), second.trim().to_string())
}

/// Slices the cleaned text into `parts` runs of roughly equal length.
///
/// Every slice but the last ends on a sentence terminator when one falls in
/// its final 30%; the remainder opens the next slice.
fn segment_evenly(text: &str, parts: usize) -> Vec<String> {
    let cleaned = clean_text(text);
    let chars: Vec<char> = cleaned.chars().collect();
    let segment_length = chars.len() / parts;

    let mut segments = Vec::with_capacity(parts);
    let mut start = 0;

    for i in 0..parts {
        let mut end = if i == parts - 1 {
            chars.len()
        } else {
            ((i + 1) * segment_length).clamp(start, chars.len())
        };

        if i < parts - 1 {
            if let Some(offset) = chars[start..end].iter().rposition(|c| is_sentence_terminator(*c)) {
                if offset * 10 >= segment_length * 7 {
                    end = start + offset + 1;
                }
            }
        }

        let slice: String = chars[start..end].iter().collect();
        let slice = slice.trim();
        if !slice.is_empty() {
            segments.push(format_content(slice));
        }
        start = end;
    }

    segments.resize(parts, String::new());
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTENCE: &str = "The reader pipeline keeps every page in order and drops nothing. ";

    fn body(sentences: usize) -> String {
        SENTENCE.repeat(sentences).trim().to_string()
    }

    fn six_section_paper() -> String {
        let headings = [
            "1. Introduction",
            "2. Method",
            "3. Results",
            "4. Discussion",
            "5. Conclusion",
            "6. References",
        ];
        let mut text = String::from("A Study of Page Ordering");
        for heading in headings {
            text.push('\n');
            text.push_str(heading);
            text.push('\n');
            text.push_str(&body(5));
        }
        text
    }

    #[test]
    fn test_always_returns_eight_segments() {
        let inputs = [
            String::new(),
            "tiny".to_string(),
            body(3),
            six_section_paper(),
            "x".repeat(20_000),
            "Line one\n\nLine two\n\n\n".repeat(50),
        ];
        for input in &inputs {
            assert_eq!(segment_content(input, ABSTRACT_NOT_FOUND).len(), SEGMENT_COUNT);
            assert_eq!(segment_content(input, "").len(), SEGMENT_COUNT);
        }
    }

    #[test]
    fn test_empty_input_gives_placeholders() {
        let segments = segment_content("", ABSTRACT_NOT_FOUND);
        assert!(segments.iter().all(String::is_empty));
    }

    #[test]
    fn test_six_section_document_keeps_section_order() {
        let segments = segment_content(&six_section_paper(), ABSTRACT_NOT_FOUND);
        assert_eq!(segments.len(), SEGMENT_COUNT);
        assert!(segments[0].starts_with("A Study of Page Ordering"));
        assert!(segments[0].contains("1. Introduction"));
        assert!(segments[1].starts_with("2. Method"));
        assert!(segments[2].starts_with("3. Results"));
        assert!(segments[3].starts_with("4. Discussion"));
        assert!(segments[4].starts_with("5. Conclusion"));
        assert!(segments[5].starts_with("6. References"));
        // the two extra slots hold second halves of split spans
        assert!(segments[6..].iter().all(|s| !s.is_empty()));
        assert!(segments[6..].iter().all(|s| !s.contains(". Introduction")));
    }

    fn packed_paragraphs(count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                format!(
                    "Paragraph {:02} opens the passage. The packing stage keeps these words \
                     together in reading order. Nothing in this block looks like a section \
                     heading at all. It ends with a closing remark that keeps the block long enough.",
                    i
                )
            })
            .collect()
    }

    #[test]
    fn test_unstructured_paragraphs_are_packed() {
        let paragraphs = packed_paragraphs(12);
        let segments = segment_content(&paragraphs.join("\n\n"), ABSTRACT_NOT_FOUND);

        assert_eq!(segments.len(), SEGMENT_COUNT);
        for (segment, paragraph) in segments.iter().zip(&paragraphs[..SEGMENT_COUNT - 1]) {
            assert_eq!(segment, paragraph);
        }
        assert_eq!(segments[7], paragraphs[7..].join("\n\n"));
    }

    #[test]
    fn test_few_packed_paragraphs_are_split_to_eight() {
        let paragraphs = packed_paragraphs(5);
        let segments = segment_content(&paragraphs.join("\n\n"), ABSTRACT_NOT_FOUND);

        assert_eq!(segments.len(), SEGMENT_COUNT);
        assert_eq!(segments[3], paragraphs[3]);
        assert_eq!(segments[4], paragraphs[4]);
        // the three longest were halved in turn; second halves follow in split order
        for (i, paragraph) in paragraphs.iter().take(3).enumerate() {
            assert!(segments[i].ends_with("heading at all."));
            assert_eq!(format!("{} {}", segments[i], segments[i + 5]), *paragraph);
        }
    }

    #[test]
    fn test_chinese_ordinal_headings() {
        let body = "本节给出这一部分的主要内容与相关说明。".repeat(7);
        let headings = ["一、引言", "二、研究方法", "三、实验结果", "四、讨论", "五、结论"];
        let mut text = String::from("论文标题");
        for heading in headings {
            text.push('\n');
            text.push_str(heading);
            text.push('\n');
            text.push_str(&body);
        }

        let segments = segment_content(&text, ABSTRACT_NOT_FOUND);
        assert_eq!(segments.len(), SEGMENT_COUNT);
        assert!(segments[0].starts_with("论文标题\n一、引言"));
        for (segment, heading) in segments[1..5].iter().zip(&headings[1..]) {
            assert!(segment.starts_with(heading), "{:?} should open with {}", segment, heading);
        }
        assert!(segments[5..].iter().all(String::is_empty));
    }

    #[test]
    fn test_roman_numeral_headings() {
        let headings = [
            "I. Introduction",
            "II. Method",
            "III. Results",
            "IV. Discussion",
            "V. Conclusion",
        ];
        let mut text = String::from("Ordering Pages");
        for heading in headings {
            text.push('\n');
            text.push_str(heading);
            text.push('\n');
            text.push_str(&body(3));
        }

        let segments = segment_content(&text, ABSTRACT_NOT_FOUND);
        assert_eq!(segments.len(), SEGMENT_COUNT);
        assert!(segments[0].starts_with("Ordering Pages\nI. Introduction"));
        for (segment, heading) in segments[1..5].iter().zip(&headings[1..]) {
            assert!(segment.starts_with(heading), "{:?} should open with {}", segment, heading);
        }
    }

    #[test]
    fn test_unstructured_text_is_sliced_evenly() {
        let text: String = SENTENCE.repeat(130).chars().take(8000).collect();
        let segments = segment_content(&text, ABSTRACT_NOT_FOUND);

        assert_eq!(segments.len(), SEGMENT_COUNT);
        for segment in &segments[..SEGMENT_COUNT - 1] {
            let length = segment.chars().count();
            assert!((700..=1300).contains(&length), "unexpected length {}", length);
            assert!(segment.ends_with('.'));
        }

        let squeeze = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        let joined: String = segments.iter().map(|s| squeeze(s)).collect();
        assert_eq!(joined, squeeze(&text));
    }

    #[test]
    fn test_abstract_is_removed_before_segmenting() {
        let abstract_text = "This study presents a method for ordering pages. The results are good.";
        let text = format!("Abstract: {}\n\n{}", abstract_text, SENTENCE.repeat(40));
        let segments = segment_content(&text, abstract_text);
        assert!(segments.iter().all(|s| !s.contains("results are good")));
        assert!(segments.iter().any(|s| s.contains("reader pipeline")));
    }

    #[test]
    fn test_remove_abstract_exact_match() {
        let out = remove_abstract("Head\nSome Abstract Body text.\nTail", "some abstract body text.");
        assert_eq!(out, "Head\n\nTail");
    }

    #[test]
    fn test_remove_abstract_ignores_reflowed_whitespace() {
        let out = remove_abstract(
            "Head\nSome  abstract\nbody text.\nTail",
            "Some abstract body text.",
        );
        assert_eq!(out, "Head\n\nTail");
    }

    #[test]
    fn test_remove_abstract_keeps_text_without_match() {
        let text = "Nothing to see here.";
        assert_eq!(remove_abstract(text, ABSTRACT_NOT_FOUND), text);
        assert_eq!(remove_abstract(text, "an unrelated abstract"), text);
    }

    #[test]
    fn test_normalize_merges_surplus_into_last() {
        let segments: Vec<String> = (0..10).map(|i| format!("s{}", i)).collect();
        let out = normalize_segments(segments, SEGMENT_COUNT);
        assert_eq!(out.len(), SEGMENT_COUNT);
        assert_eq!(out[6], "s6");
        assert_eq!(out[7], "s7\n\ns8\n\ns9");
    }

    #[test]
    fn test_normalize_pads_short_segments() {
        let segments = vec!["short one".to_string(), "short two".to_string()];
        let out = normalize_segments(segments, 4);
        assert_eq!(out, vec!["short one", "short two", "", ""]);
    }

    #[test]
    fn test_split_in_half_prefers_cjk_period() {
        let text = format!("{}。{}.{}", "甲".repeat(15), "乙".repeat(5), "丙".repeat(5));
        let (first, second) = split_in_half(&text);
        assert!(first.ends_with('。'));
        assert!(second.starts_with('乙'));
    }
}
