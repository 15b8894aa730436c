use serde::{Deserialize, Serialize};

/// Heuristic usability rating of a block of text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// 0 to 100, reduced by every detected defect
    pub score: u8,
    pub issues: Vec<String>,
    pub word_count: usize,
    pub unique_word_count: usize,
    pub sentence_count: usize,
    pub chinese_ratio: f64,
    pub english_ratio: f64,
}

impl QualityReport {
    /// Report for missing or blank input.
    pub fn empty() -> Self {
        QualityReport {
            issues: vec!["text is empty".to_string()],
            ..Default::default()
        }
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}
