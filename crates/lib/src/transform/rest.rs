use super::Transform;
use crate::errors::PipelineError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/parse_html";

// --- Adapter response envelope ---

#[derive(Deserialize, Debug)]
struct RestEnvelope {
    status: u16,
    #[serde(default)]
    data: Value,
}

/// Posts the page to an HTTP scraping adapter instead of spawning a process.
///
/// The adapter answers with `{"status": 200, "data": <page>}`; only `data` is
/// passed on to the decoder.
#[derive(Clone, Debug)]
pub struct RestTransform {
    client: ReqwestClient,
    endpoint: String,
}

impl RestTransform {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, PipelineError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PipelineError::ClientBuild)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transform for RestTransform {
    async fn transform(&self, html: &[u8]) -> Result<Vec<u8>, PipelineError> {
        info!("Posting {} bytes to transform endpoint: {}", html.len(), self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .body(html.to_vec())
            .send()
            .await
            .map_err(PipelineError::RestRequest)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::RestStatus { status, body });
        }

        let raw = response.bytes().await.map_err(PipelineError::ReadBody)?;
        let envelope: RestEnvelope = serde_json::from_slice(&raw)?;
        if envelope.status != 200 {
            return Err(PipelineError::RestEnvelope(envelope.status));
        }
        debug!("Transform endpoint answered with status {}", envelope.status);

        Ok(serde_json::to_vec(&envelope.data)?)
    }
}
