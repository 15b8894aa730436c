mod pdf;
mod source;
mod text;

pub use pdf::PdfParser;
pub use source::{extract_text, MemoryPages, PageSource, PARSE_FAILED};
pub use text::TextParser;

use crate::error::{DigestError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Pdf,
    PlainText,
    Markdown,
}

/// Picks the parser for `path` from its extension.
pub fn detect_format(path: &Path) -> Result<InputFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => Ok(InputFormat::Pdf),
        "txt" | "text" => Ok(InputFormat::PlainText),
        "md" | "markdown" => Ok(InputFormat::Markdown),
        _ => Err(DigestError::UnsupportedFormat(format!(
            "Unsupported file type: {}",
            path.display()
        ))),
    }
}
