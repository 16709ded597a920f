//! The in-memory article collection behind the blog listing
//!
//! [`ArticleCollection::load`] fetches every document concurrently, drops the
//! ones that fail, and keeps the rest sorted newest first. The category filter
//! and search query only shape [`ArticleCollection::filtered_view`]; the loaded
//! articles are never mutated.

use std::cmp::Ordering;

use futures::future::join_all;
use itertools::Itertools as _;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    Error, ErrorContext, ErrorDetail,
    article::Article,
    date,
    frontmatter::{self, ParseOptions},
    source::{self, ArticleSource},
};

const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Only(value.to_owned())
        }
    }
}

impl CategoryFilter {
    fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted.eq_ignore_ascii_case(category),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub shown: usize,
    pub total: usize,
    pub category_count: usize,
}

/// Entries dropped while loading, in request order.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub dropped: Vec<Error>,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleCollection {
    articles: Vec<Article>,
    category_filter: CategoryFilter,
    search_query: String,
}

/// Newest first. Undated articles go last; `sort_by` keeps ties in load order.
fn newest_first(a: &Article, b: &Article) -> Ordering {
    match (date::parse_date(&a.date), date::parse_date(&b.date)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

async fn load_one<S: ArticleSource>(
    source: &S,
    source_id: &str,
    options: &ParseOptions,
) -> Result<Article, Error> {
    let ctx = ErrorContext::new(source_id);
    let text = source
        .fetch(source_id)
        .await
        .map_err(|error| ctx.error(ErrorDetail::Fetch(error)))?;
    source::sniff_markup(&text).map_err(|error| ctx.error(ErrorDetail::ContentSniff(error)))?;

    let (article, diagnostics) = frontmatter::parse_with_diagnostics(&text, source_id, options);
    for diagnostic in diagnostics {
        warn!(%source_id, %diagnostic, "tolerated malformed front matter");
    }
    debug!(%source_id, id = %article.id, "loaded article");
    Ok(article)
}

impl ArticleCollection {
    /// Build a collection from already parsed articles, sorted newest first.
    pub fn from_articles(mut articles: Vec<Article>) -> Self {
        articles.sort_by(newest_first);
        Self {
            articles,
            ..Default::default()
        }
    }

    pub async fn load<S: ArticleSource>(source_ids: &[String], source: &S) -> Self {
        Self::load_with_report(source_ids, source, &ParseOptions::default())
            .await
            .0
    }

    /// Fetch and parse every document. A failing entry is dropped and
    /// recorded in the report; it never fails the whole load.
    pub async fn load_with_report<S: ArticleSource>(
        source_ids: &[String],
        source: &S,
        options: &ParseOptions,
    ) -> (Self, LoadReport) {
        let results = join_all(
            source_ids
                .iter()
                .map(|source_id| load_one(source, source_id, options)),
        )
        .await;

        let mut report = LoadReport::default();
        let mut articles = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(article) => articles.push(article),
                Err(error) => {
                    warn!(%error, "dropped article");
                    report.dropped.push(error);
                }
            }
        }
        info!(
            loaded = articles.len(),
            dropped = report.dropped.len(),
            "article collection loaded"
        );
        (Self::from_articles(articles), report)
    }

    pub fn set_category_filter(&mut self, filter: impl Into<CategoryFilter>) {
        self.category_filter = filter.into();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn category_filter(&self) -> &CategoryFilter {
        &self.category_filter
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Every loaded article, newest first.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn filtered_view(&self) -> Vec<&Article> {
        let query = self.search_query.to_lowercase();
        self.articles
            .iter()
            .filter(|article| self.category_filter.matches(&article.category))
            .filter(|article| query.is_empty() || article.matches_query(&query))
            .collect()
    }

    /// Distinct categories of the whole collection in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        self.articles
            .iter()
            .map(|article| article.category.as_str())
            .unique()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|article| article.id == id)
    }

    pub fn stats(&self) -> Stats {
        Stats {
            shown: self.filtered_view().len(),
            total: self.articles.len(),
            category_count: self.categories().len(),
        }
    }
}
