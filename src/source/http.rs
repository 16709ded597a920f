use super::{ArticleSource, FetchError};

/// Articles served over HTTP below a common base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: url::Url,
}

impl HttpSource {
    pub fn new(mut base_url: url::Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn url_for(&self, source_id: &str) -> Result<url::Url, FetchError> {
        self.base_url
            .join(source_id)
            .map_err(|error| FetchError::InvalidUrl {
                error,
                source_id: source_id.to_owned(),
            })
    }
}

impl ArticleSource for HttpSource {
    async fn fetch(&self, source_id: &str) -> Result<String, FetchError> {
        let url = self.url_for(source_id)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|error| FetchError::Request {
                error,
                url: url.clone(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status, url });
        }
        response
            .text()
            .await
            .map_err(|error| FetchError::Request { error, url })
    }
}
