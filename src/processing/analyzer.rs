//! Lightweight lexical analysis: keywords, overlap and a quality score.

use super::tables::{is_sentence_terminator, is_stop_word};
use crate::models::QualityReport;
use std::collections::{HashMap, HashSet};

pub const DEFAULT_KEYWORD_COUNT: usize = 5;

/// Lower-cases `text`, blanks out everything but word characters, CJK
/// ideographs and whitespace, then splits on whitespace.
fn tokenize(text: &str) -> Vec<String> {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    lowered.split_whitespace().map(str::to_string).collect()
}

/// Tokens of more than one character that are not stop words.
fn content_words(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|w| w.chars().count() > 1 && !is_stop_word(w))
        .collect()
}

/// Number of sentence fragments longer than ten characters.
pub(crate) fn count_sentences(text: &str) -> usize {
    text.split(is_sentence_terminator)
        .filter(|s| s.trim().chars().count() > 10)
        .count()
}

/// Returns up to `count` of the most frequent meaningful tokens.
///
/// Ties keep the order in which the tokens first appeared.
pub fn extract_keywords(text: &str, count: usize) -> Vec<String> {
    if text.trim().is_empty() || count == 0 {
        return Vec::new();
    }

    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for word in content_words(text) {
        if word.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        match index.get(&word) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(word.clone(), order.len());
                order.push((word, 1));
            }
        }
    }

    // sort_by is stable, so first-seen order survives among equal counts
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.into_iter().take(count).map(|(w, _)| w).collect()
}

/// Jaccard similarity of the non-stop-word vocabularies of two texts.
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }

    let words_a: HashSet<String> = tokenize(a).into_iter().filter(|w| !is_stop_word(w)).collect();
    let words_b: HashSet<String> = tokenize(b).into_iter().filter(|w| !is_stop_word(w)).collect();

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }

    words_a.intersection(&words_b).count() as f64 / union as f64
}

/// Scores how usable `text` looks, starting from 100 and deducting per defect.
pub fn assess_text_quality(text: &str) -> QualityReport {
    if text.trim().is_empty() {
        return QualityReport::empty();
    }

    let mut issues = Vec::new();
    let mut score: i32 = 100;

    let length = text.chars().count();
    if length < 50 {
        issues.push("text is too short".to_string());
        score -= 30;
    } else if length > 5000 {
        issues.push("text is too long".to_string());
        score -= 10;
    }

    let sentence_count = count_sentences(text);
    if sentence_count < 2 {
        issues.push("too few sentences".to_string());
        score -= 20;
    }

    let chinese_chars = text.chars().filter(|c| ('\u{4e00}'..='\u{9fff}').contains(c)).count();
    let english_chars = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
    let total_chars = text.chars().filter(|c| !c.is_whitespace()).count();

    let (chinese_ratio, english_ratio) = if total_chars > 0 {
        (
            chinese_chars as f64 / total_chars as f64,
            english_chars as f64 / total_chars as f64,
        )
    } else {
        (0.0, 0.0)
    };

    if total_chars > 0 && chinese_ratio < 0.1 && english_ratio < 0.3 {
        issues.push("low proportion of meaningful characters".to_string());
        score -= 25;
    }

    let words = content_words(text);
    let unique: HashSet<&String> = words.iter().collect();
    if !words.is_empty() {
        let repetition_ratio = 1.0 - unique.len() as f64 / words.len() as f64;
        if repetition_ratio > 0.7 {
            issues.push("too much repeated content".to_string());
            score -= 20;
        }
    }

    QualityReport {
        score: score.max(0) as u8,
        issues,
        word_count: words.len(),
        unique_word_count: unique.len(),
        sentence_count,
        chinese_ratio,
        english_ratio,
    }
}
