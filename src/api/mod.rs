use axum::http::{Method, header};
use axum::{Router, routing::post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::db::Database;
use crate::error::{ToolError, ToolResult};
use crate::pdf_tool::PdfPipeline;
use crate::search_tool::SearchOrchestrator;

pub mod handlers;
pub mod models;

/// Tools the router can dispatch to. A tool whose configuration is
/// incomplete is absent, and requests for it fail with that config error.
pub struct ToolRegistry {
    search: Result<SearchOrchestrator, String>,
    pdf: Result<PdfPipeline, String>,
    default_result_count: i64,
    search_model: String,
}

impl ToolRegistry {
    pub fn new(
        search: ToolResult<SearchOrchestrator>,
        pdf: ToolResult<PdfPipeline>,
        default_result_count: i64,
        search_model: impl Into<String>,
    ) -> Self {
        Self {
            search: search.map_err(|e| e.to_string()),
            pdf: pdf.map_err(|e| e.to_string()),
            default_result_count,
            search_model: search_model.into(),
        }
    }

    pub fn from_config(config: &Config, db: Option<&Database>) -> Self {
        let search = SearchOrchestrator::from_config(config);
        if let Err(e) = &search {
            tracing::warn!("web_search unavailable: {}", e);
        }
        let pdf = PdfPipeline::from_config(config, db);
        if let Err(e) = &pdf {
            tracing::warn!("pdf_generator unavailable: {}", e);
        }
        Self::new(search, pdf, config.default_result_count, config.search_model.clone())
    }

    pub fn search(&self) -> ToolResult<&SearchOrchestrator> {
        self.search.as_ref().map_err(|e| ToolError::Config(e.clone()))
    }

    pub fn pdf(&self) -> ToolResult<&PdfPipeline> {
        self.pdf.as_ref().map_err(|e| ToolError::Config(e.clone()))
    }

    pub fn default_result_count(&self) -> i64 {
        self.default_result_count
    }

    pub fn search_model(&self) -> &str {
        &self.search_model
    }
}

pub fn create_router(tools: Arc<ToolRegistry>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route(
            "/api/execute-tool",
            post(handlers::execute_tool).fallback(handlers::method_not_allowed),
        )
        .with_state(tools)
        .layer(cors)
}
