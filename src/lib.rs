pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod parsers;
pub mod processing;

pub use config::{Config, OutputFormat};
pub use error::{DigestError, Result};
pub use models::{PaperDigest, QualityReport};
pub use processing::{extract_abstract, segment_content, ABSTRACT_NOT_FOUND, SEGMENT_COUNT};
