use anyhow::{Result, anyhow};
use async_trait::async_trait;
use html2text::from_read;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};

use crate::data_models::Article;
use crate::error::{ToolError, ToolResult};

/// Line width handed to html2text; wide enough that paragraphs are not re-wrapped.
const TEXT_WIDTH: usize = 400;

/// Elements that never carry article text.
const NOISE: &str = "script, style, noscript, template, iframe, svg, nav, header, footer, aside, form";

/// Candidates for the main content container, most specific first.
const CONTENT_ROOTS: [&str; 4] = ["article", "main", "[role=main]", "body"];

/// Fetches a page and pulls out its readable title and text.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &Url) -> ToolResult<Article>;
}

pub struct HttpArticleExtractor {
    client: reqwest::Client,
}

impl HttpArticleExtractor {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_page(&self, url: &Url) -> Result<String> {
        let res = self.client.get(url.clone()).send().await?;
        if !res.status().is_success() {
            return Err(anyhow!("status {}", res.status()));
        }
        if let Some(content_type) = res.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !content_type.contains("html") {
                return Err(anyhow!("unsupported content type {content_type}"));
            }
        }
        let body = res.text().await?;
        Ok(body)
    }
}

#[async_trait]
impl ContentExtractor for HttpArticleExtractor {
    async fn extract(&self, url: &Url) -> ToolResult<Article> {
        let html = self
            .fetch_page(url)
            .await
            .map_err(|e| extraction_error(url, e))?;
        parse_article(&html).map_err(|e| extraction_error(url, e))
    }
}

fn extraction_error(url: &Url, e: anyhow::Error) -> ToolError {
    ToolError::Extraction {
        url: url.to_string(),
        reason: format!("{e:#}"),
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {css}: {e}"))
}

/// Extracts the title and main text of an html document.
pub fn parse_article(html: &str) -> Result<Article> {
    let mut document = Html::parse_document(html);

    let title = extract_title(&document)?;

    let noise = selector(NOISE)?;
    let noise_ids: Vec<_> = document.select(&noise).map(|el| el.id()).collect();
    for id in noise_ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    let mut root_html = None;
    for css in CONTENT_ROOTS {
        let sel = selector(css)?;
        if let Some(root) = document.select(&sel).next() {
            root_html = Some(root.html());
            break;
        }
    }

    let content = match root_html {
        Some(root_html) => Some(clean_text(&from_read(root_html.as_bytes(), TEXT_WIDTH)?)),
        None => None,
    }
    .filter(|text| !text.is_empty());

    Ok(Article { title, content })
}

fn extract_title(document: &Html) -> Result<Option<String>> {
    let og_title = selector(r#"meta[property="og:title"]"#)?;
    let title = selector("title")?;
    let h1 = selector("h1")?;

    let candidate = document
        .select(&og_title)
        .next()
        .and_then(|m| m.value().attr("content").map(str::to_string))
        .or_else(|| document.select(&title).next().map(|t| t.text().collect()))
        .or_else(|| document.select(&h1).next().map(|t| t.text().collect()));

    Ok(candidate
        .map(|t: String| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|t| !t.is_empty()))
}

/// Drops html2text link footnotes and squeezes runs of blank lines.
fn clean_text(text: &str) -> String {
    let mut out = Vec::new();
    let mut blank = false;
    for line in text.lines().map(str::trim_end) {
        if is_footnote(line) {
            continue;
        }
        if line.trim().is_empty() {
            if !blank && !out.is_empty() {
                out.push("");
            }
            blank = true;
            continue;
        }
        blank = false;
        out.push(line);
    }
    out.join("\n").trim().to_string()
}

fn is_footnote(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('[') else {
        return false;
    };
    match rest.split_once("]: ") {
        Some((n, _)) => !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

#[test]
fn test_clean_text() {
    let raw = "Heading\n\n\n\nFirst para\n[1]: https://example.com\n\n  \nSecond para\n";
    assert_eq!(clean_text(raw), "Heading\n\nFirst para\n\nSecond para");
}

#[test]
fn test_is_footnote() {
    assert!(is_footnote("[12]: https://example.com/x"));
    assert!(!is_footnote("[a]: not a footnote"));
    assert!(!is_footnote("plain text"));
}
