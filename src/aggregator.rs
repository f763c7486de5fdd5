use futures::future::join_all;

use crate::data_models::{ExtractedDocument, SearchResultItem};
use crate::extractor::ContentExtractor;

/// Successfully extracted documents in search-result order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedContext {
    documents: Vec<ExtractedDocument>,
    attempted: usize,
}

impl AggregatedContext {
    pub fn documents(&self) -> &[ExtractedDocument] {
        &self.documents
    }

    /// Number of items extraction was attempted for, successful or not.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn render(&self) -> String {
        self.documents.iter().map(ExtractedDocument::render_block).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanOutOutcome {
    Aggregated(AggregatedContext),
    /// Nothing to summarize: no items, or every extraction failed.
    NoUsableContent { attempted: usize },
}

/// Extracts every item concurrently and waits for all of them to settle.
/// Individual failures are logged and dropped; they never fail the batch.
pub async fn fan_out(extractor: &dyn ContentExtractor, items: &[SearchResultItem]) -> FanOutOutcome {
    let attempts = items.iter().enumerate().map(|(idx, item)| async move {
        let doc = match extractor.extract(&item.link).await {
            Ok(article) => ExtractedDocument::from_article(item, article),
            Err(e) => {
                tracing::debug!("extraction failed for {}: {}", item.link, e);
                None
            }
        };
        (idx, doc)
    });

    let mut slots: Vec<Option<ExtractedDocument>> = vec![None; items.len()];
    for (idx, doc) in join_all(attempts).await {
        slots[idx] = doc;
    }

    let documents: Vec<ExtractedDocument> = slots.into_iter().flatten().collect();
    if documents.is_empty() {
        return FanOutOutcome::NoUsableContent {
            attempted: items.len(),
        };
    }

    FanOutOutcome::Aggregated(AggregatedContext {
        documents,
        attempted: items.len(),
    })
}
