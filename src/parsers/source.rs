use crate::error::{DigestError, Result};
use crate::processing::clean_text;
use async_trait::async_trait;
use tracing::{info, warn};

/// Message surfaced when any page of the input cannot be read.
pub const PARSE_FAILED: &str = "PDF file parsing failed, please check the file format";

/// Ordered, page-addressable document text.
#[async_trait]
pub trait PageSource: Send + Sync {
    fn page_count(&self) -> usize;

    async fn page_text(&self, index: usize) -> Result<String>;
}

/// Pages already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPages {
    pages: Vec<String>,
}

impl MemoryPages {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn single(text: impl Into<String>) -> Self {
        Self {
            pages: vec![text.into()],
        }
    }
}

#[async_trait]
impl PageSource for MemoryPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn page_text(&self, index: usize) -> Result<String> {
        page_at(&self.pages, index)
    }
}

pub(crate) fn page_at(pages: &[String], index: usize) -> Result<String> {
    pages.get(index).cloned().ok_or_else(|| {
        DigestError::InvalidArgument(format!(
            "Page {} out of range ({} pages)",
            index,
            pages.len()
        ))
    })
}

/// Reads every page in order and returns the canonical document text.
///
/// Pages are joined with a blank line. The first failing page aborts the read.
pub async fn extract_text(source: &dyn PageSource) -> Result<String> {
    let count = source.page_count();
    let mut pages = Vec::with_capacity(count);

    for index in 0..count {
        match source.page_text(index).await {
            Ok(text) => pages.push(text),
            Err(e) => {
                warn!("Failed to read page {} of {}: {}", index + 1, count, e);
                return Err(DigestError::PdfParse(PARSE_FAILED.to_string()));
            }
        }
    }

    info!("Extracted text from {} pages", count);
    Ok(clean_text(&pages.join("\n\n")))
}
