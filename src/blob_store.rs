use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ToolError, ToolResult};

const SERVICE: &str = "Blob storage";
const API_VERSION: &str = "7";

/// Public object storage; returns the URL the object is served from.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, pathname: &str, bytes: Vec<u8>, content_type: &str) -> ToolResult<String>;
}

#[derive(Debug, Deserialize)]
struct PutBlobResponse {
    url: String,
}

/// Vercel Blob REST client.
pub struct VercelBlobClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl VercelBlobClient {
    pub fn new(client: reqwest::Client, token: String, base_url: impl Into<String>) -> Self {
        Self {
            client,
            token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for VercelBlobClient {
    async fn put(&self, pathname: &str, bytes: Vec<u8>, content_type: &str) -> ToolResult<String> {
        let url = format!("{}/{}", self.base_url, pathname.trim_start_matches('/'));
        tracing::debug!("Uploading {} bytes to: {}", bytes.len(), url);

        let resp = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header("x-api-version", API_VERSION)
            .header("x-content-type", content_type)
            .header("x-add-random-suffix", "0")
            .body(bytes)
            .send()
            .await
            .map_err(ToolError::transport(SERVICE))?;

        if !resp.status().is_success() {
            return Err(ToolError::from_response(SERVICE, resp).await);
        }

        let body: PutBlobResponse = resp.json().await.map_err(ToolError::decode(SERVICE))?;
        Ok(body.url)
    }
}
