use async_trait::async_trait;
use serde::Serialize;

use crate::error::{ToolError, ToolResult};

const SERVICE: &str = "PDFShift";

#[async_trait]
pub trait PdfConverter: Send + Sync {
    async fn convert(&self, html: &str) -> ToolResult<Vec<u8>>;
}

#[derive(Debug, Serialize)]
struct ConvertRequest<'a> {
    source: &'a str,
    sandbox: bool,
}

/// api.pdfshift.io html-to-pdf client.
pub struct PdfShiftClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    sandbox: bool,
}

impl PdfShiftClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: impl Into<String>,
        sandbox: bool,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sandbox,
        }
    }
}

#[async_trait]
impl PdfConverter for PdfShiftClient {
    async fn convert(&self, html: &str) -> ToolResult<Vec<u8>> {
        let url = format!("{}/v3/convert/pdf", self.base_url);
        tracing::debug!("Sending PDFShift request to: {}", url);

        let resp = self
            .client
            .post(&url)
            .header("X-API-Key", &self.api_key)
            .json(&ConvertRequest {
                source: html,
                sandbox: self.sandbox,
            })
            .send()
            .await
            .map_err(ToolError::transport(SERVICE))?;

        if !resp.status().is_success() {
            return Err(ToolError::from_response(SERVICE, resp).await);
        }

        let bytes = resp.bytes().await.map_err(ToolError::decode(SERVICE))?;
        Ok(bytes.to_vec())
    }
}
