//! Where article documents come from
//!
//! A source turns a source identifier (`docker-guide.md`) into the raw text of
//! the document. The collection loader only sees [`ArticleSource`].

use futures::future::join_all;
use tracing::debug;

mod http;
mod local;

pub use http::HttpSource;
pub use local::LocalSource;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to read local file ({path}): {error}")]
    ReadLocal {
        error: std::io::Error,
        path: std::path::PathBuf,
    },
    #[error("failed to list local articles: {0}")]
    ListLocal(#[from] glob::PatternError),
    #[error("invalid article location ({source_id}): {error}")]
    InvalidUrl {
        error: url::ParseError,
        source_id: String,
    },
    #[error("failed to fetch remote article ({url}): {error}")]
    Request { error: reqwest::Error, url: url::Url },
    #[error("remote article responded {status} ({url})")]
    Status {
        status: reqwest::StatusCode,
        url: url::Url,
    },
}

/// The payload looks like a markup page, not a markdown document.
///
/// Static hosts commonly answer a missing file with their fallback
/// `index.html` and a success status. Detection is a prefix check on the
/// trimmed payload and cannot catch every such page.
#[derive(Debug, thiserror::Error)]
#[error("received a markup document (starts with `{signature}`) instead of markdown")]
pub struct ContentSniffError {
    pub signature: &'static str,
}

const MARKUP_SIGNATURES: [&str; 2] = ["<!doctype", "<html"];

pub fn sniff_markup(text: &str) -> Result<(), ContentSniffError> {
    let head = text.trim_start().as_bytes();
    match MARKUP_SIGNATURES.into_iter().find(|signature| {
        head.get(..signature.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(signature.as_bytes()))
    }) {
        Some(signature) => Err(ContentSniffError { signature }),
        None => Ok(()),
    }
}

pub trait ArticleSource {
    fn fetch(&self, source_id: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// Either of the concrete sources, picked by configuration.
pub enum AnySource {
    Local(LocalSource),
    Http(HttpSource),
}

impl AnySource {
    /// Source identifiers the source can enumerate by itself, if any.
    pub fn list(&self) -> Result<Option<Vec<String>>, FetchError> {
        match self {
            Self::Local(local) => local.list().map(Some),
            Self::Http(_) => Ok(None),
        }
    }
}

impl ArticleSource for AnySource {
    async fn fetch(&self, source_id: &str) -> Result<String, FetchError> {
        match self {
            Self::Local(local) => local.fetch(source_id).await,
            Self::Http(http) => http.fetch(source_id).await,
        }
    }
}

/// Probe `<candidate>.md` for every candidate and keep the ones that exist,
/// in candidate order.
pub async fn discover<S: ArticleSource>(source: &S, candidates: &[String]) -> Vec<String> {
    let probes = candidates.iter().map(|candidate| async move {
        let source_id = format!("{candidate}.md");
        match source.fetch(&source_id).await {
            Ok(_) => Some(source_id),
            Err(error) => {
                debug!(%source_id, %error, "probe missed");
                None
            }
        }
    });
    join_all(probes).await.into_iter().flatten().collect()
}
