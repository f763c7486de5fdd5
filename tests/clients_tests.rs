use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use toolrelay::blob_store::{BlobStore, VercelBlobClient};
use toolrelay::data_models::SearchType;
use toolrelay::error::ToolError;
use toolrelay::llm::{GeminiClient, TextGenerator};
use toolrelay::pdf_converter::{PdfConverter, PdfShiftClient};
use toolrelay::search_index::{SearchIndex, SerperClient};

// ============================================================================
// Serper
// ============================================================================

#[tokio::test]
async fn test_serper_web_search_reads_organic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("X-API-KEY", "serper-key"))
        .and(body_json(json!({ "q": "budget 2025", "num": 20 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [
                { "title": "First", "link": "https://www.first.example/a", "position": 1 },
                { "title": "Broken", "link": "javascript:void(0)" },
                { "title": "Second", "link": "https://second.example/b" }
            ],
            "news": [{ "title": "ignored", "link": "https://news.example/x" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SerperClient::new(reqwest::Client::new(), "serper-key".to_string(), server.uri());
    let items = client.search("budget 2025", SearchType::Web, 20).await.unwrap();

    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    assert_eq!(items[0].source_domain, "first.example");
}

#[tokio::test]
async fn test_serper_news_search_reads_news() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "news": [{ "title": "Headline", "link": "https://paper.example/story" }]
        })))
        .mount(&server)
        .await;

    let client = SerperClient::new(reqwest::Client::new(), "k".to_string(), server.uri());
    let items = client.search("q", SearchType::News, 5).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].link.as_str(), "https://paper.example/story");
}

#[tokio::test]
async fn test_serper_missing_key_list_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "searchParameters": {} })))
        .mount(&server)
        .await;

    let client = SerperClient::new(reqwest::Client::new(), "k".to_string(), server.uri());
    assert!(client.search("q", SearchType::Web, 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_serper_error_status_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let client = SerperClient::new(reqwest::Client::new(), "bad".to_string(), server.uri());
    let err = client.search("q", SearchType::Web, 5).await.unwrap_err();
    assert!(matches!(err, ToolError::Upstream { service: "Serper", status: 401, .. }));
    assert_eq!(err.to_string(), "Serper API error! Status: 401 Unauthorized");
}

// ============================================================================
// Gemini
// ============================================================================

#[tokio::test]
async fn test_gemini_generate_sends_prompt_pair() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .and(query_param("key", "gemini-key"))
        .and(body_json(json!({
            "contents": [{ "parts": [{ "text": "user prompt" }] }],
            "systemInstruction": { "parts": [{ "text": "system prompt" }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello " }, { "text": "world" }], "role": "model" },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(reqwest::Client::new(), "gemini-key".to_string(), server.uri());
    let text = client
        .generate("gemini-test", Some("system prompt"), "user prompt")
        .await
        .unwrap();
    assert_eq!(text, "Hello world");
}

#[tokio::test]
async fn test_gemini_without_system_prompt_omits_instruction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "contents": [{ "parts": [{ "text": "only user" }] }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(reqwest::Client::new(), "k".to_string(), server.uri());
    assert_eq!(client.generate("m", None, "only user").await.unwrap(), "ok");
}

#[tokio::test]
async fn test_gemini_no_candidates_is_empty_generation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(reqwest::Client::new(), "k".to_string(), server.uri());
    let err = client.generate("m", None, "p").await.unwrap_err();
    assert!(matches!(err, ToolError::EmptyGeneration));
}

#[tokio::test]
async fn test_gemini_error_status_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let client = GeminiClient::new(reqwest::Client::new(), "k".to_string(), server.uri());
    let err = client.generate("m", None, "p").await.unwrap_err();
    assert!(matches!(err, ToolError::Upstream { status: 429, .. }));
    assert!(err.to_string().contains("quota exceeded"));
}

// ============================================================================
// PDFShift
// ============================================================================

#[tokio::test]
async fn test_pdfshift_returns_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/convert/pdf"))
        .and(header("X-API-Key", "shift-key"))
        .and(body_json(json!({ "source": "<p>hi</p>", "sandbox": true })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.7".to_vec(), "application/pdf"))
        .mount(&server)
        .await;

    let client = PdfShiftClient::new(reqwest::Client::new(), "shift-key".to_string(), server.uri(), true);
    assert_eq!(client.convert("<p>hi</p>").await.unwrap(), b"%PDF-1.7".to_vec());
}

#[tokio::test]
async fn test_pdfshift_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid source"))
        .mount(&server)
        .await;

    let client = PdfShiftClient::new(reqwest::Client::new(), "k".to_string(), server.uri(), false);
    let err = client.convert("x").await.unwrap_err();
    assert_eq!(err.to_string(), "PDFShift API error! Status: 400 invalid source");
}

// ============================================================================
// Blob storage
// ============================================================================

#[tokio::test]
async fn test_blob_put_returns_public_url() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/pdfs/session-1.pdf"))
        .and(header("authorization", "Bearer blob-token"))
        .and(header("x-content-type", "application/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://store.public.blob.example/pdfs/session-1.pdf",
            "pathname": "pdfs/session-1.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = VercelBlobClient::new(reqwest::Client::new(), "blob-token".to_string(), server.uri());
    let url = client
        .put("pdfs/session-1.pdf", b"%PDF".to_vec(), "application/pdf")
        .await
        .unwrap();
    assert_eq!(url, "https://store.public.blob.example/pdfs/session-1.pdf");
}
