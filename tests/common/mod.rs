#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use toolrelay::blob_store::BlobStore;
use toolrelay::data_models::{Article, SearchResultItem, SearchType, ToolRecord};
use toolrelay::db::ResultStore;
use toolrelay::error::{ToolError, ToolResult};
use toolrelay::extractor::ContentExtractor;
use toolrelay::llm::TextGenerator;
use toolrelay::pdf_converter::PdfConverter;
use toolrelay::search_index::SearchIndex;

pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

pub fn item(title: &str, link: &str) -> SearchResultItem {
    SearchResultItem::new(title, link).unwrap()
}

pub fn article(title: Option<&str>, content: &str) -> Article {
    Article {
        title: title.map(str::to_string),
        content: Some(content.to_string()),
    }
}

// =============================================================================
// Search index
// =============================================================================

pub struct FakeIndex {
    items: Vec<SearchResultItem>,
    fail_status: Option<u16>,
    pub calls: Mutex<Vec<(String, SearchType, u8)>>,
}

impl FakeIndex {
    pub fn returning(items: Vec<SearchResultItem>) -> Self {
        Self {
            items,
            fail_status: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            items: Vec::new(),
            fail_status: Some(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, SearchType, u8)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchIndex for FakeIndex {
    async fn search(
        &self,
        query: &str,
        search_type: SearchType,
        count: u8,
    ) -> ToolResult<Vec<SearchResultItem>> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), search_type, count));
        if let Some(status) = self.fail_status {
            return Err(ToolError::Upstream {
                service: "Serper",
                status,
                message: "boom".to_string(),
            });
        }
        Ok(self.items.clone())
    }
}

// =============================================================================
// Content extraction
// =============================================================================

/// Serves articles by url; any url without an entry fails.
pub struct FakeExtractor {
    pages: HashMap<String, (Article, Duration)>,
    calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn page(mut self, url: &str, article: Article) -> Self {
        self.pages.insert(url.to_string(), (article, Duration::ZERO));
        self
    }

    pub fn slow_page(mut self, url: &str, article: Article, delay: Duration) -> Self {
        self.pages.insert(url.to_string(), (article, delay));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentExtractor for FakeExtractor {
    async fn extract(&self, url: &Url) -> ToolResult<Article> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(url.as_str()) {
            Some((article, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(article.clone())
            }
            None => Err(ToolError::Extraction {
                url: url.to_string(),
                reason: "unreachable".to_string(),
            }),
        }
    }
}

// =============================================================================
// Generation
// =============================================================================

#[derive(Debug, Clone)]
pub struct GenerateCall {
    pub model: String,
    pub system_prompt: Option<String>,
    pub prompt: String,
}

pub struct RecordingGenerator {
    reply: Option<String>,
    calls: Mutex<Vec<GenerateCall>>,
}

impl RecordingGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<GenerateCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(
        &self,
        model: &str,
        system_prompt: Option<&str>,
        prompt: &str,
    ) -> ToolResult<String> {
        self.calls.lock().unwrap().push(GenerateCall {
            model: model.to_string(),
            system_prompt: system_prompt.map(str::to_string),
            prompt: prompt.to_string(),
        });
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(ToolError::Upstream {
                service: "Gemini",
                status: 503,
                message: "overloaded".to_string(),
            }),
        }
    }
}

// =============================================================================
// Pdf pipeline collaborators
// =============================================================================

pub struct FakeConverter {
    fail: bool,
    pub received: Mutex<Vec<String>>,
}

impl FakeConverter {
    pub fn ok() -> Self {
        Self {
            fail: false,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            received: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PdfConverter for FakeConverter {
    async fn convert(&self, html: &str) -> ToolResult<Vec<u8>> {
        self.received.lock().unwrap().push(html.to_string());
        if self.fail {
            return Err(ToolError::Upstream {
                service: "PDFShift",
                status: 400,
                message: "bad html".to_string(),
            });
        }
        Ok(b"%PDF-1.7 fake".to_vec())
    }
}

pub struct FakeBlobs {
    pub uploads: Mutex<Vec<(String, usize, String)>>,
}

impl FakeBlobs {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BlobStore for FakeBlobs {
    async fn put(&self, pathname: &str, bytes: Vec<u8>, content_type: &str) -> ToolResult<String> {
        self.uploads
            .lock()
            .unwrap()
            .push((pathname.to_string(), bytes.len(), content_type.to_string()));
        Ok(format!("https://blobs.test/{pathname}"))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub saved: Mutex<Vec<(String, String, ToolRecord)>>,
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn save_tool_result(
        &self,
        user_id: &str,
        session_id: &str,
        record: &ToolRecord,
    ) -> ToolResult<()> {
        self.saved.lock().unwrap().push((
            user_id.to_string(),
            session_id.to_string(),
            record.clone(),
        ));
        Ok(())
    }
}

/// Records every write attempt and rejects all of them.
#[derive(Default)]
pub struct FailingStore {
    pub attempted: Mutex<Vec<ToolRecord>>,
}

#[async_trait]
impl ResultStore for FailingStore {
    async fn save_tool_result(
        &self,
        _user_id: &str,
        _session_id: &str,
        record: &ToolRecord,
    ) -> ToolResult<()> {
        self.attempted.lock().unwrap().push(record.clone());
        Err(ToolError::Storage("write failed".to_string()))
    }
}
