//! Front-matter parsing for article documents
//!
//! Articles are markdown files optionally opened by a block of `key: value`
//! lines between two `---` lines. The block is a small YAML-like dialect:
//! scalars may be wrapped in one layer of quotes and `[a, b]` denotes a list.
//!
//! Parsing is total. Whatever the input looks like, [`parse`] produces an
//! [`Article`] with defaults substituted for anything missing or malformed.
//! Problems are reported on the side through [`parse_with_diagnostics`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    article::{self, Article},
    date,
};

pub(crate) const DELIMITER: &str = "---";

const MARKDOWN_EXTENSIONS: [&str; 2] = [".md", ".markdown"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FrontMatterValue {
    Scalar(String),
    List(Vec<String>),
}

pub type FrontMatter = IndexMap<String, FrontMatterValue>;

/// A document split into its front matter and markdown body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub front_matter: FrontMatter,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub words_per_minute: usize,
    pub excerpt_length: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
            excerpt_length: 150,
        }
    }
}

/// Something the parser tolerated. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error("front matter opened on line 1 is never closed; treating whole document as body")]
    UnclosedFrontMatter,
    #[error("line {line}: no `:` separator, ignored")]
    MissingSeparator { line: usize },
    #[error("line {line}: empty key, ignored")]
    EmptyKey { line: usize },
    #[error("line {line}: empty value for `{key}`, ignored")]
    EmptyValue { line: usize, key: String },
    #[error("`{key}` expects a single value but got a list")]
    UnexpectedList { key: String },
    #[error("date `{value}` is not a calendar date")]
    InvalidDate { value: String },
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_value(raw: &str) -> FrontMatterValue {
    let value = unquote(raw);
    match value
        .strip_prefix('[')
        .and_then(|value| value.strip_suffix(']'))
    {
        Some(items) => FrontMatterValue::List(
            items
                .split(',')
                .map(|item| item.trim().replace(['"', '\''], ""))
                .filter(|item| !item.is_empty())
                .collect(),
        ),
        None => FrontMatterValue::Scalar(value.to_owned()),
    }
}

fn split_impl(raw: &str, diagnostics: &mut Vec<Diagnostic>) -> Document {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let lines = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect::<Vec<_>>();

    if lines.first().map(|line| line.trim()) != Some(DELIMITER) {
        return Document {
            front_matter: Default::default(),
            body: lines.join("\n"),
        };
    }
    let Some(end) = lines
        .iter()
        .skip(1)
        .position(|line| line.trim() == DELIMITER)
        .map(|offset| offset + 1)
    else {
        diagnostics.push(Diagnostic::UnclosedFrontMatter);
        return Document {
            front_matter: Default::default(),
            body: lines.join("\n"),
        };
    };

    let mut front_matter = FrontMatter::new();
    for (index, line) in lines[1..end].iter().enumerate() {
        let line_no = index + 2;
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            diagnostics.push(Diagnostic::MissingSeparator { line: line_no });
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() {
            diagnostics.push(Diagnostic::EmptyKey { line: line_no });
            continue;
        }
        if value.is_empty() || unquote(value).is_empty() {
            diagnostics.push(Diagnostic::EmptyValue {
                line: line_no,
                key: key.to_owned(),
            });
            continue;
        }
        front_matter.insert(key.to_owned(), parse_value(value));
    }

    Document {
        front_matter,
        body: lines[end + 1..].join("\n"),
    }
}

/// Split a document into front matter and body without building an article.
///
/// Unknown keys are kept. A missing closing delimiter yields an empty front
/// matter and the whole input as body.
pub fn split(raw: &str) -> Document {
    split_impl(raw, &mut Vec::new())
}

/// Derive the article id from its source identifier.
pub fn article_id(source_id: &str) -> &str {
    MARKDOWN_EXTENSIONS
        .iter()
        .find_map(|ext| source_id.strip_suffix(ext))
        .unwrap_or(source_id)
}

fn scalar(
    front_matter: &mut FrontMatter,
    key: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<String> {
    match front_matter.shift_remove(key)? {
        FrontMatterValue::Scalar(value) => Some(value),
        FrontMatterValue::List(items) => {
            diagnostics.push(Diagnostic::UnexpectedList {
                key: key.to_owned(),
            });
            Some(items.join(",")).filter(|value| !value.is_empty())
        }
    }
}

pub fn parse_with_diagnostics(
    raw: &str,
    source_id: &str,
    options: &ParseOptions,
) -> (Article, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let Document {
        mut front_matter,
        body,
    } = split_impl(raw, &mut diagnostics);

    let title = scalar(&mut front_matter, "title", &mut diagnostics);
    let published = scalar(&mut front_matter, "date", &mut diagnostics);
    let category = scalar(&mut front_matter, "category", &mut diagnostics);
    let excerpt = scalar(&mut front_matter, "excerpt", &mut diagnostics);
    let read_time = scalar(&mut front_matter, "readTime", &mut diagnostics);
    let tags = match front_matter.shift_remove("tags") {
        Some(FrontMatterValue::List(tags)) => tags,
        Some(FrontMatterValue::Scalar(tag)) => vec![tag],
        None => Vec::new(),
    };

    if let Some(value) = published.as_deref()
        && date::parse_date(value).is_none()
    {
        diagnostics.push(Diagnostic::InvalidDate {
            value: value.to_owned(),
        });
    }

    let article = Article {
        id: article_id(source_id).to_owned(),
        title: title.unwrap_or_else(|| article::UNTITLED.to_owned()),
        date: published.unwrap_or_else(date::today),
        category: category.unwrap_or_else(|| article::DEFAULT_CATEGORY.to_owned()),
        tags,
        excerpt: excerpt
            .unwrap_or_else(|| article::extract_excerpt(&body, options.excerpt_length)),
        read_time: read_time
            .unwrap_or_else(|| article::calculate_read_time(&body, options.words_per_minute)),
        content: body,
        source_id: source_id.to_owned(),
    };
    (article, diagnostics)
}

pub fn parse_with(raw: &str, source_id: &str, options: &ParseOptions) -> Article {
    parse_with_diagnostics(raw, source_id, options).0
}

/// Parse a raw article document. Never fails.
pub fn parse(raw: &str, source_id: &str) -> Article {
    parse_with(raw, source_id, &ParseOptions::default())
}

#[cfg(test)]
mod test {
    use super::*;

    const FULL: &str = r#"---
title: "Docker Guide: From Zero"
date: 2024-03-10
category: backend
tags: [docker, "containers", 'devops']
excerpt: 'Hand written summary'
readTime: 7 min
layout: post
---
# Docker

Body text here.
"#;

    #[test]
    fn test_recognised_keys() {
        let article = parse(FULL, "docker-guide.md");
        assert_eq!(article.id, "docker-guide");
        assert_eq!(article.source_id, "docker-guide.md");
        assert_eq!(article.title, "Docker Guide: From Zero");
        assert_eq!(article.date, "2024-03-10");
        assert_eq!(article.category, "backend");
        assert_eq!(article.tags, ["docker", "containers", "devops"]);
        assert_eq!(article.excerpt, "Hand written summary");
        assert_eq!(article.read_time, "7 min");
        assert_eq!(article.content, "# Docker\n\nBody text here.\n");
    }

    #[test]
    fn test_unknown_keys_retained_by_split() {
        let document = split(FULL);
        assert_eq!(
            document.front_matter.get("layout"),
            Some(&FrontMatterValue::Scalar("post".into()))
        );
        assert_eq!(document.front_matter.len(), 7);
    }

    #[test]
    fn test_tag_quotes_stripped() {
        let article = parse("---\ntags: [a, \"b\", 'c']\n---\n", "x.md");
        assert_eq!(article.tags, ["a", "b", "c"]);
    }

    #[test]
    fn test_no_front_matter_defaults() {
        let raw = "Just a body.\n\nWith two paragraphs.";
        let article = parse(raw, "plain.md");
        assert_eq!(article.title, article::UNTITLED);
        assert_eq!(article.category, "General");
        assert!(article.tags.is_empty());
        assert_eq!(article.date, date::today());
        assert_eq!(article.excerpt, "Just a body.");
        assert_eq!(article.read_time, "1 min");
        assert_eq!(article.content, raw);
    }

    #[test]
    fn test_unclosed_front_matter_is_body() {
        let raw = "---\ntitle: Leaky\ncategory: secret\n\nBody";
        let (article, diagnostics) =
            parse_with_diagnostics(raw, "leaky.md", &ParseOptions::default());
        assert_eq!(article.title, "Untitled");
        assert_eq!(article.category, "General");
        assert_eq!(article.content, raw);
        assert_eq!(diagnostics, [Diagnostic::UnclosedFrontMatter]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let raw = "---\r\ntitle: Windows\r\n---\r\nline one\r\nline two";
        let article = parse(raw, "win.md");
        assert_eq!(article.title, "Windows");
        assert_eq!(article.content, "line one\nline two");
    }

    #[test]
    fn test_indented_delimiters_accepted() {
        let article = parse("  ---  \ntitle: Spaced\n --- \nbody", "s.md");
        assert_eq!(article.title, "Spaced");
        assert_eq!(article.content, "body");
    }

    #[test]
    fn test_malformed_lines_reported_and_ignored() {
        let raw = "---\njust words\n: orphan\ntitle:\ncategory: ''\ndate: soon\n---\nbody";
        let (article, diagnostics) =
            parse_with_diagnostics(raw, "m.md", &ParseOptions::default());
        assert_eq!(article.title, "Untitled");
        assert_eq!(article.category, "General");
        assert_eq!(article.date, "soon");
        assert_eq!(
            diagnostics,
            [
                Diagnostic::MissingSeparator { line: 2 },
                Diagnostic::EmptyKey { line: 3 },
                Diagnostic::EmptyValue {
                    line: 4,
                    key: "title".into()
                },
                Diagnostic::EmptyValue {
                    line: 5,
                    key: "category".into()
                },
                Diagnostic::InvalidDate {
                    value: "soon".into()
                },
            ]
        );
    }

    #[test]
    fn test_unclosed_list_kept_as_literal_tag() {
        let article = parse("---\ntags: [rust, async\n---\n", "t.md");
        assert_eq!(article.tags, ["[rust, async"]);
    }

    #[test]
    fn test_scalar_tag_and_empty_list() {
        assert_eq!(parse("---\ntags: rust\n---\n", "t.md").tags, ["rust"]);
        assert!(parse("---\ntags: []\n---\n", "t.md").tags.is_empty());
        assert_eq!(parse("---\ntags: [a, , b]\n---\n", "t.md").tags, ["a", "b"]);
    }

    #[test]
    fn test_quoted_list_is_still_a_list() {
        assert_eq!(parse("---\ntags: \"[x, y]\"\n---\n", "t.md").tags, ["x", "y"]);
    }

    #[test]
    fn test_list_for_scalar_field() {
        let (article, diagnostics) = parse_with_diagnostics(
            "---\ntitle: [a, b]\n---\n",
            "l.md",
            &ParseOptions::default(),
        );
        assert_eq!(article.title, "a,b");
        assert_eq!(
            diagnostics,
            [Diagnostic::UnexpectedList {
                key: "title".into()
            }]
        );
    }

    #[test]
    fn test_single_quote_char_is_literal() {
        assert_eq!(parse("---\ntitle: \"\n---\n", "q.md").title, "\"");
        assert_eq!(parse("---\ntitle: 'it's'\n---\n", "q.md").title, "it's");
    }

    #[test]
    fn test_value_with_colons() {
        let article = parse("---\ndate: 2024-01-02T10:30:00Z\n---\n", "c.md");
        assert_eq!(article.date, "2024-01-02T10:30:00Z");
    }

    #[test]
    fn test_repeated_key_last_wins() {
        assert_eq!(parse("---\ntitle: A\ntitle: B\n---\n", "r.md").title, "B");
    }

    #[test]
    fn test_derived_fields_honour_options() {
        let options = ParseOptions {
            words_per_minute: 2,
            excerpt_length: 5,
        };
        let article = parse_with("one two three four five", "o.md", &options);
        assert_eq!(article.read_time, "3 min");
        assert_eq!(article.excerpt, "one t...");
    }

    #[test]
    fn test_article_id() {
        assert_eq!(article_id("post.md"), "post");
        assert_eq!(article_id("post.markdown"), "post");
        assert_eq!(article_id("post"), "post");
        assert_eq!(article_id("v1.2-notes.md"), "v1.2-notes");
        assert_eq!(article_id("a.md.txt"), "a.md.txt");
        assert_eq!(article_id("a.md.md"), "a.md");
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let article = parse("\u{feff}---\ntitle: With BOM\n---\nbody", "bom.md");
        assert_eq!(article.title, "With BOM");
        assert_eq!(article.content, "body");

        let article = parse("\u{feff}plain body", "bom.md");
        assert_eq!(article.content, "plain body");
    }

    #[test]
    fn test_round_trip() {
        let sources = [
            FULL,
            "---\ntitle: '\"Quoted\"'\ndate: 2023-05-01\ntags: [a]\n---\nParagraph one\nstill one.\n\nTwo.",
            "No front matter at all, just text that runs long enough to matter.",
            "---\ntitle:   padded  \n---\n",
            "---\ntags: rust, async\n---\nbody",
            "---\ntags: it's\n---\nbody",
            "---\ntags: [rust, async\n---\nbody",
            "---\ntags: [solo]\n---\nbody",
        ];
        for raw in sources {
            let article = parse(raw, "rt.md");
            let reparsed = parse(&article.to_markdown(), "rt.md");
            assert_eq!(reparsed, article, "{raw}");
        }
    }
}
