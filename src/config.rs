use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::{
    frontmatter::ParseOptions,
    render::Renderer,
    source::{self, AnySource, FetchError, HttpSource, LocalSource},
};

#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    Local { dir: PathBuf },
    Http { base_url: url::Url },
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub source: SourceConfig,
    /// Explicit list of source identifiers, preferred over any discovery.
    #[serde(default)]
    pub articles: Option<Vec<String>>,
    /// Article names probed as `<name>.md` when nothing else lists articles.
    #[serde(default)]
    pub probe: Vec<String>,
    #[serde(default)]
    pub reading: ParseOptions,
    #[serde(default)]
    pub renderer: Renderer,
}

impl Config {
    /// Build the configured source. Relative local directories are resolved
    /// against `base_dir`, normally the directory holding the config file.
    pub fn source(&self, base_dir: &Path) -> AnySource {
        match &self.source {
            SourceConfig::Local { dir } => AnySource::Local(LocalSource::new(base_dir.join(dir))),
            SourceConfig::Http { base_url } => AnySource::Http(HttpSource::new(base_url.clone())),
        }
    }

    /// Source identifiers to load: the configured list, else whatever the
    /// source can enumerate, else the probe candidates that exist.
    pub async fn resolve_source_ids(&self, source: &AnySource) -> Result<Vec<String>, FetchError> {
        if let Some(articles) = &self.articles {
            return Ok(articles.clone());
        }
        if let Some(listed) = source.list()?
            && !listed.is_empty()
        {
            return Ok(listed);
        }
        let discovered = source::discover(source, &self.probe).await;
        info!(
            candidates = self.probe.len(),
            found = discovered.len(),
            "discovered articles by probing"
        );
        Ok(discovered)
    }
}
