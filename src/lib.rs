pub mod article;
pub mod collection;
pub mod config;
pub mod date;
pub mod frontmatter;
pub mod render;
pub mod source;

#[cfg(test)]
mod tests;

pub use article::Article;
pub use collection::{ArticleCollection, CategoryFilter, Stats};
pub use frontmatter::{ParseOptions, parse};

#[derive(Debug, thiserror::Error)]
#[error("{context}: {detail}")]
pub struct Error {
    pub context: Box<ErrorContext>,
    pub detail: Box<ErrorDetail>,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub source_id: String,
}

impl ErrorContext {
    fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
        }
    }

    fn error(&self, detail: ErrorDetail) -> Error {
        Error {
            context: Box::new(self.clone()),
            detail: Box::new(detail),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorDetail {
    #[error("Failed to fetch article: {0}")]
    Fetch(source::FetchError),
    #[error("Unexpected content: {0}")]
    ContentSniff(source::ContentSniffError),
}
