use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::data_models::{ResearchMode, SearchRequest, SearchType};
use crate::error::ToolError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteToolRequest {
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_input: Option<serde_json::Value>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// `toolInput` of a `web_search` call. Both the camelCase names and the
/// legacy snake_case ones are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct SearchToolInput {
    #[serde(default)]
    pub query: String,
    #[serde(default, rename = "searchType", alias = "search_type")]
    pub search_type: Option<String>,
    #[serde(default, rename = "resultCount", alias = "num_results")]
    pub result_count: Option<serde_json::Number>,
    #[serde(default, rename = "mode", alias = "research_mode")]
    pub mode: Option<String>,
    #[serde(default, rename = "modelId", alias = "gemini_model")]
    pub model_id: Option<String>,
}

impl SearchToolInput {
    pub fn into_request(
        self,
        default_result_count: i64,
        default_model: &str,
    ) -> Result<SearchRequest, ToolError> {
        SearchRequest::new(
            self.query,
            self.search_type
                .as_deref()
                .map(SearchType::parse)
                .unwrap_or_default(),
            self.result_count
                .as_ref()
                .and_then(count_from_number)
                .unwrap_or(default_result_count),
            self.mode.as_deref().map(ResearchMode::parse).unwrap_or_default(),
            self.model_id
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| default_model.to_string()),
        )
    }
}

/// Any JSON number is accepted as a count; clamping happens in `SearchRequest`.
fn count_from_number(n: &serde_json::Number) -> Option<i64> {
    n.as_i64()
        .or_else(|| n.as_u64().map(|_| i64::MAX))
        .or_else(|| n.as_f64().filter(|f| !f.is_nan()).map(|f| f as i64))
}

#[derive(Debug, Serialize)]
pub struct SearchToolResponse {
    pub result: String,
}

/// Error body of the tool endpoint.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    MethodNotAllowed,
    Failed(String),
}

impl From<ToolError> for ApiError {
    fn from(e: ToolError) -> Self {
        if e.is_invalid_input() {
            ApiError::BadRequest(e.to_string())
        } else {
            ApiError::Failed(e.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": error }))).into_response()
            }
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({ "error": "Only POST method is allowed" })),
            )
                .into_response(),
            ApiError::Failed(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": error })),
            )
                .into_response(),
        }
    }
}
