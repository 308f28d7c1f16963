//! # Pipeline
//!
//! Fetch → transform → decode → select, each step awaited before the next.

use crate::config::AppConfig;
use crate::decode::{decode_page, select_leading};
use crate::errors::PipelineError;
use crate::fetch::PageFetcher;
use crate::transform::Transform;
use crate::types::Book;
use tracing::info;

#[derive(Debug)]
pub struct Pipeline {
    fetcher: PageFetcher,
    transform: Box<dyn Transform>,
    url: String,
    count: usize,
}

impl Pipeline {
    pub fn new(
        fetcher: PageFetcher,
        transform: Box<dyn Transform>,
        url: impl Into<String>,
        count: usize,
    ) -> Self {
        Self {
            fetcher,
            transform,
            url: url.into(),
            count,
        }
    }

    /// Builds the fetcher and the configured transform.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        Ok(Self::new(
            PageFetcher::new()?,
            config.transform.build()?,
            config.url.clone(),
            config.count,
        ))
    }

    /// Runs every step once and returns the leading books.
    ///
    /// Nothing is retried. A transport failure stops the run before the
    /// transform is touched.
    pub async fn run(&self) -> Result<Vec<Book>, PipelineError> {
        let html = self.fetcher.fetch(&self.url).await?;
        let raw = self.transform.transform(&html).await?;
        let page = decode_page(&raw)?;
        let books = select_leading(page.books, self.count)?;
        info!("Selected {} books from {}", books.len(), self.url);
        Ok(books)
    }
}
