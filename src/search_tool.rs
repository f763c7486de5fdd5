use std::sync::Arc;

use crate::aggregator::{self, AggregatedContext, FanOutOutcome};
use crate::config::Config;
use crate::data_models::{Notice, SearchOutcome, SearchRequest, SearchResultItem};
use crate::error::ToolResult;
use crate::extractor::{ContentExtractor, HttpArticleExtractor};
use crate::llm::{GeminiClient, TextGenerator};
use crate::search_index::{SearchIndex, SerperClient};
use crate::summarizer::Summarizer;

/// Pipeline position of a search run. Failures leave through `?` from any stage.
enum SearchState {
    Querying,
    Extracting(Vec<SearchResultItem>),
    Summarizing(AggregatedContext),
    Done(SearchOutcome),
}

/// Index lookup, fan-out extraction, then one summarization call.
pub struct SearchOrchestrator {
    index: Arc<dyn SearchIndex>,
    extractor: Arc<dyn ContentExtractor>,
    summarizer: Summarizer,
}

impl SearchOrchestrator {
    pub fn new(
        index: Arc<dyn SearchIndex>,
        extractor: Arc<dyn ContentExtractor>,
        summarizer: Summarizer,
    ) -> Self {
        Self {
            index,
            extractor,
            summarizer,
        }
    }

    /// Wires the production adapters. Fails before any outbound call when
    /// credentials are missing.
    pub fn from_config(config: &Config) -> ToolResult<Self> {
        let (serper_key, gemini_key) = config.search_credentials()?;
        let client = config.http_client()?;

        let index = SerperClient::new(client.clone(), serper_key.to_string(), &config.serper_base_url);
        let extractor = HttpArticleExtractor::new(client.clone());
        let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(
            client,
            gemini_key.to_string(),
            &config.gemini_base_url,
        ));

        Ok(Self::new(
            Arc::new(index),
            Arc::new(extractor),
            Summarizer::new(generator),
        ))
    }

    pub async fn run(&self, request: &SearchRequest) -> ToolResult<SearchOutcome> {
        let mut state = SearchState::Querying;
        loop {
            state = match state {
                SearchState::Querying => {
                    tracing::info!(
                        "[search] querying {} index for {:?} (count {})",
                        request.search_type(),
                        request.query(),
                        request.result_count()
                    );
                    let items = self
                        .index
                        .search(request.query(), request.search_type(), request.result_count())
                        .await?;
                    if items.is_empty() {
                        SearchState::Done(SearchOutcome::Informational(Notice::NoResults {
                            search_type: request.search_type(),
                            query: request.query().to_string(),
                        }))
                    } else {
                        SearchState::Extracting(items)
                    }
                }
                SearchState::Extracting(items) => {
                    tracing::info!("[search] extracting content from {} URLs", items.len());
                    match aggregator::fan_out(self.extractor.as_ref(), &items).await {
                        FanOutOutcome::Aggregated(context) => {
                            tracing::info!(
                                "[search] extracted content from {}/{} URLs",
                                context.documents().len(),
                                context.attempted()
                            );
                            SearchState::Summarizing(context)
                        }
                        FanOutOutcome::NoUsableContent { attempted } => {
                            tracing::warn!("[search] no content extracted from {attempted} URLs");
                            SearchState::Done(SearchOutcome::Informational(
                                Notice::NoExtractableContent,
                            ))
                        }
                    }
                }
                SearchState::Summarizing(context) => {
                    tracing::info!(
                        "[search] summarizing with {} in {} mode",
                        request.model_id(),
                        request.mode()
                    );
                    let summary = self
                        .summarizer
                        .summarize(&context, request.query(), request.mode(), request.model_id())
                        .await?;
                    SearchState::Done(SearchOutcome::Summary(summary))
                }
                SearchState::Done(outcome) => return Ok(outcome),
            };
        }
    }
}
