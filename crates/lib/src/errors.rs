use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced while running the fetch → transform → decode → select pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to fetch '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response body: {0}")]
    ReadBody(#[source] reqwest::Error),
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("Failed to start transform '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write page to transform stdin: {0}")]
    StdinWrite(#[source] std::io::Error),
    #[error("Transform process I/O failed: {0}")]
    ProcessIo(#[source] std::io::Error),
    #[error("Transform exited with {status}: {stderr}")]
    TransformFailed { status: ExitStatus, stderr: String },
    #[error("Failed to send page to transform endpoint: {0}")]
    RestRequest(#[source] reqwest::Error),
    #[error("Transform endpoint returned status {status}: {body}")]
    RestStatus { status: u16, body: String },
    #[error("Transform endpoint reported status {0} in its response envelope")]
    RestEnvelope(u16),
    #[error("Failed to decode transform output: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Expected at least {needed} books, but the page contains {found}")]
    NotEnoughBooks { needed: usize, found: usize },
}

impl PipelineError {
    /// True for failures to reach the catalogue at all.
    ///
    /// These are reported and the run ends normally; every other kind is fatal.
    pub fn is_transport(&self) -> bool {
        matches!(self, PipelineError::Fetch { .. })
    }
}
