use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::data_models::{SearchResultItem, SearchType};
use crate::error::{ToolError, ToolResult};

const SERVICE: &str = "Serper";

/// Search index lookup: one call per search request, hits in ranking order.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn search(
        &self,
        query: &str,
        search_type: SearchType,
        count: u8,
    ) -> ToolResult<Vec<SearchResultItem>>;
}

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: u8,
}

#[derive(Debug, Default, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperHit>,
    #[serde(default)]
    news: Vec<SerperHit>,
}

#[derive(Debug, Deserialize)]
struct SerperHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
}

/// google.serper.dev client.
pub struct SerperClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SerperClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchIndex for SerperClient {
    async fn search(
        &self,
        query: &str,
        search_type: SearchType,
        count: u8,
    ) -> ToolResult<Vec<SearchResultItem>> {
        let url = format!("{}/{}", self.base_url, search_type.as_str());
        tracing::debug!("Sending Serper request to: {}", url);

        let resp = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .json(&SerperRequest { q: query, num: count })
            .send()
            .await
            .map_err(ToolError::transport(SERVICE))?;

        if !resp.status().is_success() {
            return Err(ToolError::from_response(SERVICE, resp).await);
        }

        let body: SerperResponse = resp.json().await.map_err(ToolError::decode(SERVICE))?;
        let hits = match search_type {
            SearchType::Web => body.organic,
            SearchType::News => body.news,
        };

        let items = hits
            .into_iter()
            .filter_map(|hit| {
                let item = SearchResultItem::new(hit.title, &hit.link);
                if item.is_none() {
                    tracing::warn!("skipping search hit with unusable link: {:?}", hit.link);
                }
                item
            })
            .collect();
        Ok(items)
    }
}
