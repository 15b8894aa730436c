//! Read-only lookup tables shared by the text pipeline.
//!
//! Every heading, terminator and vocabulary list lives here as plain data.
//! Adding a language or a synonym means editing a table, not the matchers.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// English and Chinese stop words.
///
/// The English article "a" is absent: single-letter tokens are already dropped
/// by the keyword tokenizer, and set similarity counts them.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // English
        "the", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
        "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
        "would", "could", "should", "may", "might", "must", "can", "this", "that", "these",
        "those",
        // Chinese
        "的", "了", "在", "是", "我", "有", "和", "就", "不", "人", "都", "一", "一个", "上",
        "也", "很", "到", "说", "要", "去", "你", "会", "着", "没有", "看", "好", "自己", "这",
        "那", "他", "她", "它", "们", "这个", "那个", "什么", "怎么", "为什么", "因为", "所以",
        "但是", "如果", "虽然", "然而",
    ]
    .into_iter()
    .collect()
});

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word.to_lowercase().as_str())
}

/// Terms that mark a passage as a research abstract. Matched case-insensitively.
pub const ABSTRACT_VOCABULARY: &[&str] = &[
    "research", "study", "analysis", "method", "result", "conclusion", "研究", "分析", "方法",
    "结果", "结论", "目的", "基于", "提出",
];

/// Sentence terminators, full-width and ASCII.
pub const SENTENCE_TERMINATORS: &[char] = &['。', '.', '!', '?', '！', '？'];

pub fn is_sentence_terminator(c: char) -> bool {
    SENTENCE_TERMINATORS.contains(&c)
}

/// An abstract heading together with the section starts that close its body.
pub struct AbstractHeading {
    pub name: &'static str,
    /// Regex fragment matched case-insensitively; includes the trailing separator.
    pub heading: &'static str,
    /// Regex fragments recognized at the start of a line after the body.
    pub terminators: &'static [&'static str],
}

/// Abstract headings in priority order.
pub const ABSTRACT_HEADINGS: &[AbstractHeading] = &[
    AbstractHeading {
        name: "english",
        heading: r"abstract\s*[:：]\s*",
        terminators: &[r"keywords?", "introduction", r"1\.", "§", r"\d+\."],
    },
    AbstractHeading {
        name: "english-extended",
        heading: r"abstract\s*[:：]\s*",
        terminators: &[
            r"key\s*words?",
            r"index\s+terms",
            "引言",
            "绪论",
            "前言",
            r"1\.",
            "§",
            r"\d+\.",
        ],
    },
    AbstractHeading {
        name: "chinese",
        heading: r"摘\s*要\s*[:：]\s*",
        terminators: &["关键词", "引言", "绪论", "前言", r"1\.", "§", r"\d+\."],
    },
    AbstractHeading {
        name: "bracketed",
        heading: r"【摘要】\s*",
        terminators: &["【关键词】", "引言", "绪论", "前言", r"1\.", "§", r"\d+\."],
    },
    AbstractHeading {
        name: "generic",
        heading: r"(?:abstract|摘要)\s*[:：]\s*",
        terminators: &["关键词", r"keywords?", "引言", "introduction", r"1\.", "§", r"\d+\."],
    },
];

/// Trailing keyword sections removed from an abstract body.
pub const KEYWORD_SECTION_STARTS: &[&str] =
    &[r"key\s*words?", r"index\s+terms", "关键词", "【关键词】"];

/// Canonical paper sections, in the order they are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Introduction,
    Method,
    Results,
    Discussion,
    Conclusion,
    References,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Introduction => "introduction",
            Section::Method => "method",
            Section::Results => "results",
            Section::Discussion => "discussion",
            Section::Conclusion => "conclusion",
            Section::References => "references",
        }
    }
}

/// Line-leading forms of one section heading: arabic ordinal, Chinese ordinal,
/// Roman numeral, then English and Chinese titles.
pub struct SectionMarker {
    pub section: Section,
    pub forms: &'static [&'static str],
}

pub const SECTION_MARKERS: &[SectionMarker] = &[
    SectionMarker {
        section: Section::Introduction,
        forms: &[r"1\.", "一、", r"I\.", "Introduction", "引言", "绪论", "前言"],
    },
    SectionMarker {
        section: Section::Method,
        forms: &[r"2\.", "二、", r"II\.", "Methodology", "Method", "研究方法", "方法"],
    },
    SectionMarker {
        section: Section::Results,
        forms: &[r"3\.", "三、", r"III\.", "Results", "Result", "实验结果", "结果"],
    },
    SectionMarker {
        section: Section::Discussion,
        forms: &[r"4\.", "四、", r"IV\.", "Discussion", "讨论", "分析"],
    },
    SectionMarker {
        section: Section::Conclusion,
        forms: &[r"5\.", "五、", r"V\.", "Conclusion", "结论", "总结"],
    },
    SectionMarker {
        section: Section::References,
        forms: &[r"6\.", "六、", r"VI\.", "References", "Reference", "参考文献"],
    },
];

/// Builds a case-insensitive matcher for any of `forms` at the start of a line.
///
/// `(?m)` lets `^` anchor at every line start; the `marker` group starts at the
/// first non-blank character of the heading.
///
/// # Panics
///
/// If a form is not a valid regex fragment.
pub fn line_start_matcher(forms: &[&str]) -> Regex {
    let pattern = format!(r"(?im)^[ \t]*(?P<marker>(?:{}))", forms.join("|"));
    Regex::new(&pattern).unwrap()
}

/// Builds a case-insensitive matcher for any of `forms` following a line break.
///
/// # Panics
///
/// If a form is not a valid regex fragment.
pub fn after_newline_matcher(forms: &[&str]) -> Regex {
    let pattern = format!(r"(?i)\n\s*(?:{})", forms.join("|"));
    Regex::new(&pattern).unwrap()
}
