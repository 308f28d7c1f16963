//! # Page Fetching
//!
//! A single HTTP GET whose body is returned as raw bytes. The status code is
//! only logged: any response whose body can be drained counts as a page.

use crate::errors::PipelineError;
use reqwest::Client as ReqwestClient;
use tracing::{debug, info};

/// The catalogue page fetched when nothing else is configured.
pub const DEFAULT_CATALOGUE_URL: &str = "https://books.toscrape.com/catalogue/page-3.html";

/// Builds the catalogue URL for a given page number.
pub fn catalogue_page_url(page: u32) -> String {
    format!("https://books.toscrape.com/catalogue/page-{page}.html")
}

#[derive(Clone, Debug)]
pub struct PageFetcher {
    client: ReqwestClient,
}

impl PageFetcher {
    pub fn new() -> Result<Self, PipelineError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PipelineError::ClientBuild)?;
        Ok(Self { client })
    }

    /// Fetches `url` and drains the whole body.
    ///
    /// Connection-level failures come back as [`PipelineError::Fetch`]; a body
    /// that breaks off after the headers arrived is [`PipelineError::ReadBody`].
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, PipelineError> {
        info!("Fetching page: {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| PipelineError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        debug!("Received HTTP {status} from {url}");

        let body = response.bytes().await.map_err(PipelineError::ReadBody)?;
        info!("Fetched {} bytes from {url}", body.len());
        Ok(body.to_vec())
    }
}
