// HTTP page fetcher (reqwest)

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::downloader::errors::DownloadError;
use crate::downloader::models::NetworkConfig;
use crate::downloader::traits::PageFetcher;

/// Fetches metadata pages and manifests over plain HTTP(S).
///
/// The same client is shared with the transfer engine so the proxy applies to
/// media downloads too.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &NetworkConfig) -> Result<Self, DownloadError> {
        let mut builder = Client::builder();

        if let Some(proxy_url) = config.proxy.as_deref() {
            tracing::info!("[Http] Using proxy: {}", proxy_url);
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_page(&self, url: &str) -> Result<String, DownloadError> {
        tracing::debug!("[Http] GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("[Http] {} answered {}", url, status);
            return Err(DownloadError::HttpStatus(status));
        }

        Ok(response.text().await?)
    }
}
