use crate::config::Config;
use crate::error::Result;
use crate::models::{NewDigest, PaperDigest, QualityReport};
use crate::parsers::{detect_format, extract_text, InputFormat, PageSource, PdfParser, TextParser};
use crate::processing::{
    assess_text_quality, clean_text, extract_abstract, extract_keywords, segment_content,
    ABSTRACT_NOT_FOUND,
};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

/// Reads a PDF, text or Markdown file and digests it.
pub async fn digest_file(file_path: &str, config: &Config) -> Result<PaperDigest> {
    info!("Digesting {}", file_path);

    match detect_format(Path::new(file_path))? {
        InputFormat::Pdf => {
            let parser = PdfParser::open(file_path).await?;
            let sha256 = parser.sha256().to_string();
            digest_pages(&parser, file_path, Some(sha256), config).await
        }
        InputFormat::PlainText | InputFormat::Markdown => {
            let parser = TextParser::open(file_path).await?;
            let sha256 = parser.sha256().to_string();
            digest_pages(&parser, file_path, Some(sha256), config).await
        }
    }
}

/// Digests any page source; a failing page fails the whole digest.
pub async fn digest_pages(
    pages: &dyn PageSource,
    source: &str,
    source_sha256: Option<String>,
    config: &Config,
) -> Result<PaperDigest> {
    let text = extract_text(pages).await?;
    Ok(assemble(&text, source, source_sha256, pages.page_count(), config))
}

/// Digests text that is already in memory, treated as a single page.
pub fn digest_text(text: &str, source: &str, config: &Config) -> PaperDigest {
    assemble(&clean_text(text), source, None, 1, config)
}

fn assemble(
    text: &str,
    source: &str,
    source_sha256: Option<String>,
    page_count: usize,
    config: &Config,
) -> PaperDigest {
    let abstract_text = extract_abstract(text);
    let abstract_found = abstract_text != ABSTRACT_NOT_FOUND;
    let segments = segment_content(text, &abstract_text);

    let keywords = if config.include_keywords {
        let keyword_source = if abstract_found { abstract_text.as_str() } else { text };
        extract_keywords(keyword_source, config.keyword_count)
    } else {
        Vec::new()
    };

    let quality = config.include_quality.then(|| {
        if abstract_found {
            assess_text_quality(&abstract_text)
        } else {
            QualityReport::empty()
        }
    });

    info!(
        "Digest of {}: abstract found = {}, {} non-empty segments",
        source,
        abstract_found,
        segments.iter().filter(|s| !s.is_empty()).count()
    );

    PaperDigest::new(NewDigest {
        source: source.to_string(),
        source_sha256,
        page_count,
        abstract_text,
        abstract_found,
        segments,
        keywords,
        quality,
    })
}

/// Human-readable rendering used by the `text` output format.
pub fn render_text(digest: &PaperDigest) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Source: {}", digest.source);
    let _ = writeln!(out, "Pages: {}", digest.page_count);
    if let Some(sha256) = &digest.source_sha256 {
        let _ = writeln!(out, "SHA-256: {}", sha256);
    }
    if !digest.keywords.is_empty() {
        let _ = writeln!(out, "Keywords: {}", digest.keywords.join(", "));
    }
    if let Some(quality) = &digest.quality {
        if quality.has_issues() {
            let _ = writeln!(out, "Quality: {}/100 ({})", quality.score, quality.issues.join("; "));
        } else {
            let _ = writeln!(out, "Quality: {}/100", quality.score);
        }
    }

    let _ = write!(out, "\n== Abstract ==\n{}\n", digest.abstract_text);

    for (position, segment) in digest.filled_segments() {
        let _ = write!(out, "\n== Segment {} ==\n{}\n", position, segment);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DigestError;
    use crate::parsers::MemoryPages;
    use crate::processing::SEGMENT_COUNT;

    const ABSTRACT: &str = "This study presents a method for robust segmentation of scholarly documents. \
                            The results show clear gains over strong baselines.";

    fn paper() -> String {
        let body = "Every page of the paper is kept in reading order by the pipeline. ".repeat(5);
        let mut text = format!("Robust Segmentation\nAbstract: {}\nKeywords: x, y", ABSTRACT);
        for heading in ["1. Introduction", "2. Method", "3. Results", "4. Discussion", "5. Conclusion"] {
            text.push('\n');
            text.push_str(heading);
            text.push('\n');
            text.push_str(body.trim());
        }
        text
    }

    #[test]
    fn test_digest_text_finds_abstract_and_segments() {
        let digest = digest_text(&paper(), "inline", &Config::default());

        assert!(digest.abstract_found);
        assert_eq!(digest.abstract_text, ABSTRACT);
        assert_eq!(digest.segments.len(), SEGMENT_COUNT);
        assert!(digest.segments.iter().all(|s| !s.contains("clear gains")));
        assert_eq!(digest.keywords.len(), 5);
        assert_eq!(digest.keywords[0], "study");
        assert_eq!(digest.quality.as_ref().map(|q| q.score), Some(100));
    }

    #[test]
    fn test_digest_respects_config_switches() {
        let config = Config {
            include_keywords: false,
            include_quality: false,
            ..Config::default()
        };
        let digest = digest_text(&paper(), "inline", &config);
        assert!(digest.keywords.is_empty());
        assert!(digest.quality.is_none());
    }

    #[test]
    fn test_digest_without_abstract() {
        let digest = digest_text("nothing useful here", "inline", &Config::default());
        assert!(!digest.abstract_found);
        assert_eq!(digest.abstract_text, ABSTRACT_NOT_FOUND);
        assert_eq!(digest.segments.len(), SEGMENT_COUNT);
        assert_eq!(digest.keywords, vec!["nothing", "useful", "here"]);
        assert_eq!(digest.quality.unwrap().score, 0);
    }

    #[tokio::test]
    async fn test_digest_pages_counts_pages() {
        let text = paper();
        let (first, second) = text.split_at(text.find("3. Results").unwrap());
        let pages = MemoryPages::new(vec![first.to_string(), second.to_string()]);

        let digest = digest_pages(&pages, "memory", None, &Config::default()).await.unwrap();
        assert_eq!(digest.page_count, 2);
        assert!(digest.abstract_found);
    }

    #[tokio::test]
    async fn test_digest_file_reads_text_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.txt");
        std::fs::write(&path, paper()).unwrap();

        let digest = digest_file(path.to_str().unwrap(), &Config::default()).await.unwrap();
        assert_eq!(digest.abstract_text, ABSTRACT);
        assert_eq!(digest.source_sha256.as_ref().map(String::len), Some(64));
    }

    #[tokio::test]
    async fn test_digest_file_errors() {
        let missing = digest_file("/no/such/paper.pdf", &Config::default()).await;
        assert!(matches!(missing, Err(DigestError::NotFound(_))));

        let unsupported = digest_file("paper.docx", &Config::default()).await;
        assert!(matches!(unsupported, Err(DigestError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_render_text() {
        let digest = digest_text(&paper(), "inline", &Config::default());
        let rendered = render_text(&digest);

        assert!(rendered.starts_with("Source: inline\nPages: 1\n"));
        assert!(rendered.contains("Keywords: study, presents"));
        assert!(rendered.contains("Quality: 100/100\n"));
        assert!(rendered.contains(&format!("== Abstract ==\n{}\n", ABSTRACT)));
        assert!(rendered.contains("== Segment 1 ==\n"));
        assert!(!rendered.contains("SHA-256"));
    }
}
