//! Rule-based text pipeline: normalize, find the abstract, segment the rest.

mod abstract_extractor;
mod analyzer;
mod normalizer;
mod segmenter;
mod tables;

pub use abstract_extractor::{
    extract_abstract, find_abstract, validate_abstract, AbstractCandidate, AbstractOrigin,
    ABSTRACT_NOT_FOUND,
};
pub use analyzer::{assess_text_quality, calculate_similarity, extract_keywords, DEFAULT_KEYWORD_COUNT};
pub use normalizer::{clean_text, format_content, split_paragraphs, truncate_content, MAX_CONTENT_CHARS};
pub use segmenter::{segment_content, SEGMENT_COUNT};
pub use tables::{is_stop_word, Section};
