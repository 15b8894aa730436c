use super::source::{page_at, PageSource};
use super::{detect_format, InputFormat};
use crate::error::{DigestError, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::info;

/// Page break in plain-text exports of paginated documents.
const FORM_FEED: char = '\u{c}';

/// Plain text or Markdown read as pages separated by form feeds.
pub struct TextParser {
    file_path: String,
    sha256: String,
    pages: Vec<String>,
}

impl TextParser {
    pub async fn open(file_path: &str) -> Result<Self> {
        let path = Path::new(file_path);
        if !path.exists() {
            return Err(DigestError::NotFound(file_path.to_string()));
        }

        let format = detect_format(path)?;
        let data = tokio::fs::read(path).await?;
        let sha256 = format!("{:x}", Sha256::digest(&data));
        let content = String::from_utf8(data).map_err(|_| {
            DigestError::UnsupportedFormat(format!("{} is not valid UTF-8 text", file_path))
        })?;

        let pages = split_pages(&content, format == InputFormat::Markdown);
        info!("Read {} pages from {}", pages.len(), file_path);

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
impl PageSource for TextParser {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn page_text(&self, index: usize) -> Result<String> {
        page_at(&self.pages, index)
    }
}

fn split_pages(content: &str, markdown: bool) -> Vec<String> {
    content
        .split(FORM_FEED)
        .map(|page| {
            if markdown {
                strip_markdown(page)
            } else {
                page.to_string()
            }
        })
        .collect()
}

/// Drops code fences and heading markers so headings read like plain section
/// titles at the start of a line.
fn strip_markdown(content: &str) -> String {
    let mut lines = Vec::new();
    let mut in_code_block = false;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }

        if !in_code_block && trimmed.starts_with('#') {
            let heading = trimmed.trim_start_matches('#').trim();
            if !heading.is_empty() {
                lines.push(heading.to_string());
                continue;
            }
        }

        lines.push(line.to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markdown() {
        let md = "# Title\n\n## 1. Introduction\nBody text.\n```\n# not a heading\n```\n";
        assert_eq!(
            strip_markdown(md),
            "Title\n\n1. Introduction\nBody text.\n# not a heading"
        );
    }

    #[test]
    fn test_form_feed_splits_pages() {
        let pages = split_pages("one\u{c}two\u{c}three", false);
        assert_eq!(pages, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_open_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.md");
        std::fs::write(&path, "# Paper\nFirst page\u{c}Second page").unwrap();

        let parser = TextParser::open(path.to_str().unwrap()).await.unwrap();
        assert_eq!(parser.page_count(), 2);
        assert_eq!(parser.page_text(0).await.unwrap(), "Paper\nFirst page");
        assert_eq!(parser.sha256().len(), 64);
    }

    #[tokio::test]
    async fn test_rejects_binary_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        let result = TextParser::open(path.to_str().unwrap()).await;
        assert!(matches!(result, Err(DigestError::UnsupportedFormat(_))));
    }
}
