pub mod rest;
pub mod stdin;

pub use rest::RestTransform;
pub use stdin::StdinTransform;

use crate::errors::PipelineError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Converts fetched HTML into the JSON `Page` document.
///
/// The scraping itself happens outside this crate; implementations only move
/// bytes to the collaborator and bring its answer back.
#[async_trait]
pub trait Transform: Send + Sync + Debug {
    /// Hands `html` to the collaborator and returns the JSON bytes it produced.
    async fn transform(&self, html: &[u8]) -> Result<Vec<u8>, PipelineError>;
}
