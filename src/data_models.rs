use mongodb::bson::DateTime;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ToolError;

pub const MIN_RESULT_COUNT: i64 = 1;
pub const MAX_RESULT_COUNT: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    #[default]
    Web,
    News,
}

impl SearchType {
    /// Anything other than `news` is a regular web search.
    pub fn parse(raw: &str) -> SearchType {
        if raw.trim().eq_ignore_ascii_case("news") {
            SearchType::News
        } else {
            SearchType::Web
        }
    }

    /// Name used both for the index endpoint path and in user-facing messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Web => "search",
            SearchType::News => "news",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResearchMode {
    Quick,
    #[default]
    Deep,
}

impl ResearchMode {
    /// Only `deep` selects the analyst template; `quick`, `normal` and
    /// anything unrecognised fall back to the short summary.
    pub fn parse(raw: &str) -> ResearchMode {
        if raw.trim().eq_ignore_ascii_case("deep") {
            ResearchMode::Deep
        } else {
            ResearchMode::Quick
        }
    }
}

impl fmt::Display for ResearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResearchMode::Quick => f.write_str("quick"),
            ResearchMode::Deep => f.write_str("deep"),
        }
    }
}

pub fn clamp_result_count(requested: i64) -> u8 {
    requested.clamp(MIN_RESULT_COUNT, MAX_RESULT_COUNT) as u8
}

/// A validated search tool invocation. Fields are private so the clamping
/// and non-empty query guarantees hold for every instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    search_type: SearchType,
    result_count: u8,
    mode: ResearchMode,
    model_id: String,
}

impl SearchRequest {
    pub fn new(
        query: impl Into<String>,
        search_type: SearchType,
        result_count: i64,
        mode: ResearchMode,
        model_id: impl Into<String>,
    ) -> Result<SearchRequest, ToolError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(ToolError::InvalidInput(
                "Request body must contain \"toolInput\" with a \"query\"".to_string(),
            ));
        }
        Ok(SearchRequest {
            query,
            search_type,
            result_count: clamp_result_count(result_count),
            mode,
            model_id: model_id.into(),
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_type(&self) -> SearchType {
        self.search_type
    }

    pub fn result_count(&self) -> u8 {
        self.result_count
    }

    pub fn mode(&self) -> ResearchMode {
        self.mode
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultItem {
    pub title: String,
    pub link: Url,
    pub source_domain: String,
}

impl SearchResultItem {
    /// Returns `None` when the link is not an absolute http(s) URL.
    pub fn new(title: impl Into<String>, link: &str) -> Option<SearchResultItem> {
        let link = Url::parse(link).ok()?;
        if link.scheme() != "http" && link.scheme() != "https" {
            return None;
        }
        let source_domain = display_domain(&link);
        Some(SearchResultItem {
            title: title.into(),
            link,
            source_domain,
        })
    }
}

pub fn display_domain(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// What the extraction collaborator hands back for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub title: String,
    pub domain: String,
    pub url: Url,
    pub body_text: String,
}

impl ExtractedDocument {
    /// Pairs an extracted article with its originating hit. An article with
    /// no content (or only whitespace) is not a document.
    pub fn from_article(item: &SearchResultItem, article: Article) -> Option<ExtractedDocument> {
        let body_text = article.content?.trim().to_string();
        if body_text.is_empty() {
            return None;
        }
        let title = article
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| item.title.clone());
        Some(ExtractedDocument {
            title,
            domain: item.source_domain.clone(),
            url: item.link.clone(),
            body_text,
        })
    }

    pub fn render_block(&self) -> String {
        format!(
            "## {}\n**Domain:** {}\n**URL:** {}\n\n{}\n\n---\n\n",
            self.title, self.domain, self.url, self.body_text
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    pub text: String,
}

/// Informational, non-error endings of the search pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoResults { search_type: SearchType, query: String },
    NoExtractableContent,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoResults { search_type, query } => {
                write!(f, "No {search_type} results found for '{query}'.")
            }
            Notice::NoExtractableContent => f.write_str(
                "Found search results, but could not extract content from any page.",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Summary(SummaryResult),
    Informational(Notice),
}

impl SearchOutcome {
    pub fn is_summary(&self) -> bool {
        matches!(self, SearchOutcome::Summary(_))
    }

    pub fn into_text(self) -> String {
        match self {
            SearchOutcome::Summary(summary) => summary.text,
            SearchOutcome::Informational(notice) => notice.to_string(),
        }
    }
}

pub const PDF_TOOL_NAME: &str = "pdf_generator";

/// Outcome of a pdf tool run, both returned to the caller and persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToolRecord {
    pub tool_name: String,
    pub tool_input: serde_json::Value,
    pub tool_output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl ToolRecord {
    pub fn pdf_success(tool_input: serde_json::Value, url: &str) -> ToolRecord {
        ToolRecord {
            tool_name: PDF_TOOL_NAME.to_string(),
            tool_input,
            tool_output: format!("✅ PDF Created. Download link: {url}"),
            download_url: Some(url.to_string()),
        }
    }

    pub fn pdf_failure(tool_input: serde_json::Value, message: &str) -> ToolRecord {
        ToolRecord {
            tool_name: PDF_TOOL_NAME.to_string(),
            tool_input,
            tool_output: format!("❌ Error creating PDF: {message}"),
            download_url: None,
        }
    }
}

/// One chat session's history entry in the document store.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HistoryEntry {
    pub user_id: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolRecord>,
    pub updated_at: DateTime,
}
