use std::path::PathBuf;

use super::{ArticleSource, FetchError};

/// Articles stored as files in one directory.
#[derive(Debug, Clone)]
pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File names of every `*.md` document in the directory, sorted.
    pub fn list(&self) -> Result<Vec<String>, FetchError> {
        let pattern = self.dir.join("*.md");
        let mut names = glob::glob(&pattern.to_string_lossy())?
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .filter_map(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(str::to_owned)
            })
            .collect::<Vec<_>>();
        names.sort();
        Ok(names)
    }
}

impl ArticleSource for LocalSource {
    async fn fetch(&self, source_id: &str) -> Result<String, FetchError> {
        let path = self.dir.join(source_id);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|error| FetchError::ReadLocal { error, path })
    }
}
