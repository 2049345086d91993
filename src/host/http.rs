use async_trait::async_trait;

use crate::error::PanelError;

/// Downloaded attachment bytes plus the content type the server reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBytes {
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

/// Downloads attachment bytes from the short-lived URLs the host hands out.
/// Split from the host traits so tests can substitute canned responses.
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> Result<FetchedBytes, PanelError>;
}

/// Production fetcher backed by a shared reqwest client.
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttachmentFetcher for HttpFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<FetchedBytes, PanelError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| PanelError::NetworkFetch {
                url: url.to_string(),
                reason: err.to_string(),
            })?;

        // Any non-success status fails the record, which in turn fails the
        // whole batch at the pipeline join.
        if !response.status().is_success() {
            return Err(PanelError::NetworkFetch {
                url: url.to_string(),
                reason: format!("status {}", response.status()),
            });
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|err| PanelError::NetworkFetch {
                url: url.to_string(),
                reason: err.to_string(),
            })?
            .to_vec();

        Ok(FetchedBytes { bytes, mime })
    }
}
