use super::QualityReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The reading digest of one paper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperDigest {
    pub id: String,
    /// Path or label of the input
    pub source: String,
    pub source_sha256: Option<String>,
    pub page_count: usize,
    pub created_at: DateTime<Utc>,
    pub abstract_text: String,
    pub abstract_found: bool,
    /// Always exactly eight entries; unused slots are empty
    pub segments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityReport>,
}

/// Digest contents before an id and timestamp are assigned
#[derive(Debug, Clone)]
pub struct NewDigest {
    pub source: String,
    pub source_sha256: Option<String>,
    pub page_count: usize,
    pub abstract_text: String,
    pub abstract_found: bool,
    pub segments: Vec<String>,
    pub keywords: Vec<String>,
    pub quality: Option<QualityReport>,
}

impl PaperDigest {
    pub fn new(new_digest: NewDigest) -> Self {
        PaperDigest {
            id: Uuid::new_v4().to_string(),
            source: new_digest.source,
            source_sha256: new_digest.source_sha256,
            page_count: new_digest.page_count,
            created_at: Utc::now(),
            abstract_text: new_digest.abstract_text,
            abstract_found: new_digest.abstract_found,
            segments: new_digest.segments,
            keywords: new_digest.keywords,
            quality: new_digest.quality,
        }
    }

    /// Segments that carry text, with their 1-based position.
    pub fn filled_segments(&self) -> impl Iterator<Item = (usize, &str)> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_empty())
            .map(|(i, s)| (i + 1, s.as_str()))
    }
}
