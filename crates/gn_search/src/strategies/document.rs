//! Primary strategy: full-text search over a remote document index.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use gn_core::config::DocumentSearchConfig;
use gn_core::{ArticleCandidate, Error, Result};

use crate::country::country_for_domain;
use crate::dedup;
use crate::strategy::{SearchOptions, SearchStrategy};

/// The backend silently truncates over-long queries, so at most this many
/// keywords go into one request.
const MAX_QUERY_KEYWORDS: usize = 3;

/// Words kept per keyword phrase, for the same reason.
const MAX_PHRASE_WORDS: usize = 3;

pub struct DocumentSearch {
    client: reqwest::Client,
    config: DocumentSearchConfig,
    available: AtomicBool,
}

#[derive(Debug, Deserialize)]
struct DocResponse {
    #[serde(default)]
    articles: Vec<DocArticle>,
}

#[derive(Debug, Deserialize)]
struct DocArticle {
    #[serde(default)]
    url: String,
    #[serde(default)]
    domain: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    seendate: String,
}

impl DocumentSearch {
    pub fn new(config: DocumentSearchConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            config,
            available: AtomicBool::new(true),
        }
    }

    /// Boolean-OR phrase query from the top keywords, each truncated to its
    /// first few words and quoted for phrase search.
    fn build_query(keywords: &[String]) -> String {
        keywords
            .iter()
            .take(MAX_QUERY_KEYWORDS)
            .map(|k| {
                let phrase = k
                    .split_whitespace()
                    .take(MAX_PHRASE_WORDS)
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("\"{}\"", phrase)
            })
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    fn mark_unavailable(&self, reason: &str) {
        self.available.store(false, Ordering::Relaxed);
        warn!("⚠️ document search marked unavailable: {}", reason);
    }

    fn candidates_from_response(body: DocResponse, countries: &[String]) -> Vec<ArticleCandidate> {
        let mut candidates = Vec::with_capacity(body.articles.len());
        for item in body.articles {
            if item.url.trim().is_empty() {
                // Malformed record: skip it, keep its siblings.
                continue;
            }
            let domain = if item.domain.trim().is_empty() {
                host_of(&item.url)
            } else {
                item.domain
            };
            let country = country_for_domain(&domain);
            if !countries.is_empty() && !countries.iter().any(|c| c == &country) {
                continue;
            }
            candidates.push(ArticleCandidate {
                url: item.url,
                source_domain: domain,
                title: (!item.title.trim().is_empty()).then(|| item.title.trim().to_string()),
                published_date: parse_seendate(&item.seendate),
                tone_score: 0.0,
                raw_locations: String::new(),
                raw_themes: String::new(),
                country,
            });
        }
        dedup::dedupe(candidates)
    }
}

#[async_trait]
impl SearchStrategy for DocumentSearch {
    fn name(&self) -> &str {
        "document"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    async fn search(
        &self,
        keywords: &[String],
        opts: &SearchOptions,
    ) -> Result<Vec<ArticleCandidate>> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let query = Self::build_query(keywords);
        let max_records = self.config.max_records.to_string();
        let params = [
            ("query", query.as_str()),
            ("mode", "list"),
            ("maxrecords", max_records.as_str()),
            ("format", "json"),
            ("sort", "date-desc"),
            ("timespan", self.config.timespan.as_str()),
        ];
        info!("🔍 document search: {}", query);

        let response = match self
            .client
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() {
                    format!("timeout after {}s", self.config.timeout_secs)
                } else {
                    format!("transport failure: {}", e)
                };
                self.mark_unavailable(&reason);
                return Err(Error::StrategyUnavailable(reason));
            }
        };

        if !response.status().is_success() {
            let reason = format!("status {}", response.status());
            self.mark_unavailable(&reason);
            return Err(Error::StrategyUnavailable(reason));
        }

        // A malformed body is a parse error, not an outage: the breaker
        // stays closed and the coordinator falls back for this call only.
        let body: DocResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("document search response: {}", e)))?;

        let candidates = Self::candidates_from_response(body, &opts.countries);
        info!("✨ document search returned {} candidates", candidates.len());
        Ok(candidates)
    }
}

/// `seendate` comes as `YYYYMMDDThhmmssZ`; the date is its first 8 chars.
fn parse_seendate(seendate: &str) -> Option<NaiveDate> {
    let head = seendate.get(..8)?;
    NaiveDate::parse_from_str(head, "%Y%m%d").ok()
}

fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(url: &str, domain: &str, title: &str, seendate: &str) -> DocArticle {
        DocArticle {
            url: url.to_string(),
            domain: domain.to_string(),
            title: title.to_string(),
            seendate: seendate.to_string(),
        }
    }

    #[test]
    fn query_uses_at_most_three_keywords() {
        let keywords: Vec<String> = ["one", "two", "three", "four"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            DocumentSearch::build_query(&keywords),
            "\"one\" OR \"two\" OR \"three\""
        );
    }

    #[test]
    fn long_phrases_truncate_to_three_words() {
        let keywords = vec!["North Korea missile test program".to_string()];
        assert_eq!(
            DocumentSearch::build_query(&keywords),
            "\"North Korea missile\""
        );
    }

    #[test]
    fn seendate_parses_from_first_eight_chars() {
        assert_eq!(
            parse_seendate("20240101T083000Z"),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(parse_seendate("garbage"), None);
        assert_eq!(parse_seendate(""), None);
    }

    #[test]
    fn records_without_url_are_skipped() {
        let body = DocResponse {
            articles: vec![
                article("", "cnn.com", "No url", "20240101T000000Z"),
                article("http://cnn.com/a", "cnn.com", "Ok", "20240101T000000Z"),
            ],
        };
        let candidates = DocumentSearch::candidates_from_response(body, &[]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "http://cnn.com/a");
    }

    #[test]
    fn country_is_inferred_from_domain() {
        let body = DocResponse {
            articles: vec![
                article("http://news.chosun.co.kr/a", "news.chosun.co.kr", "", ""),
                article("http://cnn.com/b", "cnn.com", "", ""),
            ],
        };
        let candidates = DocumentSearch::candidates_from_response(body, &[]);
        assert_eq!(candidates[0].country, "KR");
        assert_eq!(candidates[1].country, "US");
    }

    #[test]
    fn missing_domain_falls_back_to_url_host() {
        let body = DocResponse {
            articles: vec![article("https://lemonde.fr/politique/a", "", "", "")],
        };
        let candidates = DocumentSearch::candidates_from_response(body, &[]);
        assert_eq!(candidates[0].source_domain, "lemonde.fr");
        assert_eq!(candidates[0].country, "FR");
    }

    #[test]
    fn country_filter_keeps_matching_hits_only() {
        let body = DocResponse {
            articles: vec![
                article("http://chosun.co.kr/a", "chosun.co.kr", "", ""),
                article("http://cnn.com/b", "cnn.com", "", ""),
            ],
        };
        let candidates =
            DocumentSearch::candidates_from_response(body, &["KR".to_string()]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].country, "KR");
    }

    #[test]
    fn own_results_are_deduplicated() {
        let body = DocResponse {
            articles: vec![
                article("http://cnn.com/a?ref=x", "cnn.com", "", ""),
                article("http://cnn.com/a", "cnn.com", "", ""),
            ],
        };
        let candidates = DocumentSearch::candidates_from_response(body, &[]);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn breaker_starts_closed() {
        let strategy = DocumentSearch::new(DocumentSearchConfig::default());
        assert!(strategy.is_available());
    }
}
