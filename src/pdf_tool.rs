use chrono::Utc;
use std::sync::Arc;

use crate::blob_store::{BlobStore, VercelBlobClient};
use crate::config::Config;
use crate::data_models::ToolRecord;
use crate::db::{Database, ResultStore, ToolResultRepo};
use crate::error::{ToolError, ToolResult};
use crate::llm::{GeminiClient, TextGenerator, strip_code_fences};
use crate::pdf_converter::{PdfConverter, PdfShiftClient};
use crate::prompts;

const FALLBACK_REQUEST: &str = "your document";

/// The session a pdf run belongs to; its result is stored under this key.
#[derive(Debug, Clone)]
pub struct SessionKey {
    pub user_id: String,
    pub session_id: String,
}

/// Text to turn into a document: `prompt`, else `content_to_convert`.
pub fn request_text(tool_input: &serde_json::Value) -> &str {
    ["prompt", "content_to_convert"]
        .iter()
        .filter_map(|key| tool_input.get(key).and_then(|v| v.as_str()))
        .find(|s| !s.is_empty())
        .unwrap_or(FALLBACK_REQUEST)
}

/// Generate html, convert it to pdf, upload it, record the result.
pub struct PdfPipeline {
    generator: Arc<dyn TextGenerator>,
    converter: Arc<dyn PdfConverter>,
    blobs: Arc<dyn BlobStore>,
    store: Option<Arc<dyn ResultStore>>,
    model: String,
}

impl PdfPipeline {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        converter: Arc<dyn PdfConverter>,
        blobs: Arc<dyn BlobStore>,
        store: Option<Arc<dyn ResultStore>>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            converter,
            blobs,
            store,
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config, db: Option<&Database>) -> ToolResult<Self> {
        let (gemini_key, pdfshift_key, blob_token) = config.pdf_credentials()?;
        let client = config.http_client()?;

        let store = db.map(|db| Arc::new(ToolResultRepo::new(db)) as Arc<dyn ResultStore>);

        Ok(Self::new(
            Arc::new(GeminiClient::new(
                client.clone(),
                gemini_key.to_string(),
                &config.gemini_base_url,
            )),
            Arc::new(PdfShiftClient::new(
                client.clone(),
                pdfshift_key.to_string(),
                &config.pdfshift_base_url,
                config.pdfshift_sandbox,
            )),
            Arc::new(VercelBlobClient::new(
                client,
                blob_token.to_string(),
                &config.blob_base_url,
            )),
            store,
            config.pdf_model.clone(),
        ))
    }

    pub async fn run(&self, tool_input: serde_json::Value, session: &SessionKey) -> ToolResult<ToolRecord> {
        let Some(store) = &self.store else {
            return Err(ToolError::Config(
                "Database connection, userId, and sessionId are required for pdf-tool.".to_string(),
            ));
        };
        if session.user_id.is_empty() || session.session_id.is_empty() {
            return Err(ToolError::InvalidInput(
                "Database connection, userId, and sessionId are required for pdf-tool.".to_string(),
            ));
        }

        match self.produce_and_record(&tool_input, session, store.as_ref()).await {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::error!("[pdf] failed for session {}: {}", session.session_id, e);
                let record = ToolRecord::pdf_failure(tool_input, &e.to_string());
                if let Err(store_err) = store
                    .save_tool_result(&session.user_id, &session.session_id, &record)
                    .await
                {
                    tracing::error!("[pdf] could not record failure: {}", store_err);
                }
                Err(ToolError::Pdf(record.tool_output))
            }
        }
    }

    /// Everything up to and including the success write; any error here is
    /// recorded as a failure by `run`.
    async fn produce_and_record(
        &self,
        tool_input: &serde_json::Value,
        session: &SessionKey,
        store: &dyn ResultStore,
    ) -> ToolResult<ToolRecord> {
        let url = self.produce(tool_input, &session.session_id).await?;
        let record = ToolRecord::pdf_success(tool_input.clone(), &url);
        store
            .save_tool_result(&session.user_id, &session.session_id, &record)
            .await?;
        Ok(record)
    }

    async fn produce(&self, tool_input: &serde_json::Value, session_id: &str) -> ToolResult<String> {
        tracing::info!("[pdf] generating html with {}", self.model);
        let user_prompt = prompts::pdf_user_prompt(request_text(tool_input));
        let generated = self
            .generator
            .generate(&self.model, Some(prompts::PDF_MASTER_PROMPT), &user_prompt)
            .await?;
        let html = strip_code_fences(&generated);
        if html.is_empty() {
            return Err(ToolError::EmptyGeneration);
        }

        tracing::info!("[pdf] converting {} bytes of html", html.len());
        let pdf = self.converter.convert(html).await?;

        let pathname = format!("pdfs/{}-{}.pdf", session_id, Utc::now().timestamp_millis());
        tracing::info!("[pdf] uploading {}", pathname);
        self.blobs.put(&pathname, pdf, "application/pdf").await
    }
}
