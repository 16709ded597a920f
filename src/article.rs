//! The article record and the metadata derived from its body.

use std::{fmt::Write as _, sync::LazyLock};

use serde::{Deserialize, Serialize};

use crate::frontmatter::{DELIMITER, ParseOptions};

pub const UNTITLED: &str = "Untitled";
pub const DEFAULT_CATEGORY: &str = "General";

const ELLIPSIS: &str = "...";

static HEADING: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?m)^#+\s+.*").unwrap());

static CODE_FENCE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?s)```.*?```").unwrap());

static INLINE_CODE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"`[^`]+`").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    /// ISO-8601 date as written by the author. Not validated.
    pub date: String,
    pub category: String,
    pub tags: Vec<String>,
    pub excerpt: String,
    pub read_time: String,
    pub content: String,
    pub source_id: String,
}

/// First paragraph of the body with headings and code removed, truncated to
/// `max_len` characters plus `...`.
pub fn extract_excerpt(body: &str, max_len: usize) -> String {
    let cleaned = HEADING.replace_all(body, "");
    let cleaned = CODE_FENCE.replace_all(&cleaned, "");
    let cleaned = INLINE_CODE.replace_all(&cleaned, "");
    let cleaned = cleaned.trim();

    let first_paragraph = cleaned.split("\n\n").next().unwrap_or_default();
    match first_paragraph.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &first_paragraph[..cut]),
        None => first_paragraph.to_owned(),
    }
}

pub fn calculate_read_time(body: &str, words_per_minute: usize) -> String {
    let words = body.split_whitespace().count();
    let minutes = words.div_ceil(words_per_minute.max(1));
    format!("{minutes} min")
}

fn push_scalar(out: &mut String, key: &str, value: &str) {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted || value.trim() != value {
        writeln!(out, "{key}: \"{value}\"").unwrap();
    } else {
        writeln!(out, "{key}: {value}").unwrap();
    }
}

impl Article {
    pub fn to_markdown(&self) -> String {
        self.to_markdown_with(&ParseOptions::default())
    }

    /// Re-embed the recognised fields as front matter ahead of the content.
    ///
    /// `excerpt` and `readTime` are written only when they differ from what
    /// the body would derive under `options`, so parsing the output yields
    /// this article again.
    pub fn to_markdown_with(&self, options: &ParseOptions) -> String {
        let mut out = String::new();
        out.push_str(DELIMITER);
        out.push('\n');
        push_scalar(&mut out, "title", &self.title);
        push_scalar(&mut out, "date", &self.date);
        push_scalar(&mut out, "category", &self.category);
        match self.tags.as_slice() {
            [tag] => writeln!(out, "tags: \"{tag}\"").unwrap(),
            tags => writeln!(out, "tags: [{}]", tags.join(", ")).unwrap(),
        }
        if self.excerpt != extract_excerpt(&self.content, options.excerpt_length) {
            push_scalar(&mut out, "excerpt", &self.excerpt);
        }
        if self.read_time != calculate_read_time(&self.content, options.words_per_minute) {
            push_scalar(&mut out, "readTime", &self.read_time);
        }
        out.push_str(DELIMITER);
        out.push('\n');
        out.push_str(&self.content);
        out
    }

    pub fn matches_query(&self, query_lowercase: &str) -> bool {
        self.title.to_lowercase().contains(query_lowercase)
            || self.excerpt.to_lowercase().contains(query_lowercase)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(query_lowercase))
    }
}
