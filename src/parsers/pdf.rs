use super::source::{page_at, PageSource, PARSE_FAILED};
use crate::error::{DigestError, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{info, warn};

/// A PDF decoded into per-page text.
pub struct PdfParser {
    file_path: String,
    sha256: String,
    pages: Vec<String>,
}

impl PdfParser {
    /// Reads and decodes the whole file. Decoding runs on the blocking pool.
    pub async fn open(file_path: &str) -> Result<Self> {
        let path = Path::new(file_path);
        if !path.exists() {
            return Err(DigestError::NotFound(file_path.to_string()));
        }

        let data = tokio::fs::read(path).await?;
        let sha256 = format!("{:x}", Sha256::digest(&data));

        let pages = tokio::task::spawn_blocking(move || extract_pages(&data))
            .await
            .map_err(|e| DigestError::Internal(format!("PDF extraction task failed: {}", e)))??;

        info!("Decoded {} pages from {}", pages.len(), file_path);

        Ok(Self {
            file_path: file_path.to_string(),
            sha256,
            pages,
        })
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn sha256(&self) -> &str {
        &self.sha256
    }
}

#[async_trait]
impl PageSource for PdfParser {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn page_text(&self, index: usize) -> Result<String> {
        page_at(&self.pages, index)
    }
}

/// pdf_extract panics on some malformed files, so both failure paths are
/// turned into a parse error.
fn extract_pages(data: &[u8]) -> Result<Vec<String>> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }));

    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => {
            warn!("PDF extraction failed: {}", e);
            Err(DigestError::PdfParse(PARSE_FAILED.to_string()))
        }
        Err(_) => {
            warn!("PDF extraction panicked on malformed document");
            Err(DigestError::PdfParse(PARSE_FAILED.to_string()))
        }
    }
}
