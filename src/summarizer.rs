use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::aggregator::AggregatedContext;
use crate::data_models::{ResearchMode, SummaryResult};
use crate::error::ToolResult;
use crate::llm::TextGenerator;
use crate::prompts::{self, CONTEXT_TEXT, CURRENT_DATE, QUERY};

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Builds the mode-specific prompt and makes the single generation call.
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    today: fn() -> NaiveDate,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            today: utc_today,
        }
    }

    /// Overrides the date source used by deep mode.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn build_prompt(&self, context: &AggregatedContext, query: &str, mode: ResearchMode) -> String {
        let context_text = context.render();
        let current_date = (mode == ResearchMode::Deep)
            .then(|| (self.today)().format("%Y-%m-%d").to_string());

        let mut vars = HashMap::from([(QUERY, query), (CONTEXT_TEXT, context_text.as_str())]);
        if let Some(date) = &current_date {
            vars.insert(CURRENT_DATE, date.as_str());
        }
        prompts::render(prompts::template_for(mode), &vars)
    }

    pub async fn summarize(
        &self,
        context: &AggregatedContext,
        query: &str,
        mode: ResearchMode,
        model_id: &str,
    ) -> ToolResult<SummaryResult> {
        let prompt = self.build_prompt(context, query, mode);
        let text = self.generator.generate(model_id, None, &prompt).await?;
        Ok(SummaryResult { text })
    }
}
