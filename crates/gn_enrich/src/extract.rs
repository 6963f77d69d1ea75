//! Generic article body extraction over plain HTTP.
//!
//! News sites vary too much for per-site selectors here; this extractor
//! walks a list of likely body containers and joins their paragraph text.
//! Everything is best-effort: fetch or parse trouble yields an empty
//! extraction, never an error, so one dead URL cannot poison a batch.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use gn_core::{ContentExtractor, Extraction, Result};

/// Some outlets serve bots a stub page; a browser-like identity gets the
/// same markup a reader would.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Containers tried in order when looking for the article body.
const BODY_CANDIDATES: &[&str] = &[
    "article",
    "main",
    "#content",
    ".content",
    ".article-body",
    "body",
];

/// Anything shorter is boilerplate, not an article body.
const MIN_BODY_CHARS: usize = 100;

pub struct HttpContentExtractor {
    client: Client,
}

impl HttpContentExtractor {
    pub fn new(timeout_secs: u64) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://www.google.com/"),
        );
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

#[async_trait]
impl ContentExtractor for HttpContentExtractor {
    async fn extract_with_title(&self, url: &str) -> Result<Extraction> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("⚠️ fetch failed for {}: {}", url, e);
                return Ok(Extraction::default());
            }
        };
        if !response.status().is_success() {
            warn!("⚠️ fetch returned {} for {}", response.status(), url);
            return Ok(Extraction::default());
        }
        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                warn!("⚠️ body read failed for {}: {}", url, e);
                return Ok(Extraction::default());
            }
        };
        Ok(extract_from_html(&html))
    }
}

/// Pull title and body text out of raw HTML.
pub fn extract_from_html(html: &str) -> Extraction {
    let document = Html::parse_document(html);
    Extraction {
        title: extract_title(&document),
        content: extract_body(&document),
    }
}

fn extract_title(document: &Html) -> String {
    let h1 = Selector::parse("h1").unwrap();
    if let Some(el) = document.select(&h1).next() {
        let text = element_text(el);
        if !text.is_empty() {
            return text;
        }
    }

    let og_title = Selector::parse("meta[property='og:title']").unwrap();
    if let Some(el) = document.select(&og_title).next() {
        if let Some(content) = el.value().attr("content") {
            let trimmed = content.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }

    let title = Selector::parse("title").unwrap();
    document
        .select(&title)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn extract_body(document: &Html) -> String {
    for candidate in BODY_CANDIDATES {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        if let Some(container) = document.select(&selector).next() {
            let text = paragraph_text(container);
            if text.chars().count() >= MIN_BODY_CHARS {
                return text;
            }
        }
    }
    String::new()
}

/// Join the text of all paragraph descendants. Paragraph-scoped collection
/// keeps script, nav and caption junk out without a DOM rewrite.
fn paragraph_text(container: ElementRef) -> String {
    let p = Selector::parse("p").unwrap();
    container
        .select(&p)
        .map(|el| element_text(el))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
