use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::{Json, extract::State};
use std::sync::Arc;
use std::time::Instant;

use crate::data_models::PDF_TOOL_NAME;
use crate::pdf_tool::SessionKey;

use super::ToolRegistry;
use super::models::{ApiError, ExecuteToolRequest, SearchToolInput, SearchToolResponse};

pub const WEB_SEARCH: &str = "web_search";
pub const PDF_GENERATOR: &str = PDF_TOOL_NAME;

pub async fn execute_tool(
    State(tools): State<Arc<ToolRegistry>>,
    request: Result<Json<ExecuteToolRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let Json(request) = request.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let tool_name = request.tool_name.clone().unwrap_or_default();

    let response = match tool_name.as_str() {
        WEB_SEARCH => web_search(&tools, request.tool_input).await,
        PDF_GENERATOR => pdf_generator(&tools, request).await,
        _ => Err(ApiError::BadRequest(format!(
            "Unsupported tool \"{tool_name}\". Supported tools are \"{WEB_SEARCH}\" and \"{PDF_GENERATOR}\"."
        ))),
    };

    match &response {
        Ok(_) => tracing::info!(
            "[execute-tool] {} completed in {}ms",
            tool_name,
            start.elapsed().as_millis()
        ),
        Err(ApiError::Failed(e)) => tracing::error!("[execute-tool] {} failed: {}", tool_name, e),
        Err(_) => {}
    }
    response
}

async fn web_search(
    tools: &ToolRegistry,
    tool_input: Option<serde_json::Value>,
) -> Result<Response, ApiError> {
    let missing_query =
        || ApiError::BadRequest("Request body must contain \"toolInput\" with a \"query\"".to_string());

    let input: SearchToolInput = match tool_input {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| ApiError::BadRequest(format!("Invalid toolInput: {e}")))?,
        None => return Err(missing_query()),
    };
    if input.query.trim().is_empty() {
        return Err(missing_query());
    }

    let search = tools.search()?;
    let request = input.into_request(tools.default_result_count(), tools.search_model())?;
    let outcome = search.run(&request).await?;

    Ok(Json(SearchToolResponse {
        result: outcome.into_text(),
    })
    .into_response())
}

async fn pdf_generator(
    tools: &ToolRegistry,
    request: ExecuteToolRequest,
) -> Result<Response, ApiError> {
    let (Some(user_id), Some(session_id)) = (request.user_id, request.session_id) else {
        return Err(ApiError::BadRequest(
            "Request body must contain \"userId\" and \"sessionId\" for the pdf tool".to_string(),
        ));
    };
    let tool_input = request
        .tool_input
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()));

    let pipeline = tools.pdf()?;
    let record = pipeline
        .run(
            tool_input,
            &SessionKey {
                user_id,
                session_id,
            },
        )
        .await?;

    Ok(Json(record).into_response())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
