//! Fallback strategy: structured queries over a historical metadata
//! warehouse.
//!
//! The warehouse is time-partitioned article metadata without body text or
//! titles, so keyword matching runs against the URL string itself and every
//! query is restricted to a trusted-domain allowlist: without full text to
//! verify against, the strategy trades recall for precision.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use gn_core::config::WarehouseConfig;
use gn_core::{ArticleCandidate, Error, Result};

use crate::strategy::{SearchOptions, SearchStrategy};

/// Video and social platforms are never news sources worth enriching.
const EXCLUDED_SOURCES: &[&str] = &[
    "youtube.com",
    "twitter.com",
    "facebook.com",
    "instagram.com",
];

/// URLs at or beyond this length are junk (trackers, data URIs).
const MAX_URL_LEN: usize = 500;

/// One row of the metadata table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarehouseRow {
    #[serde(default)]
    pub document_identifier: String,
    #[serde(default)]
    pub source_name: String,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub partition_date: String,
    /// Comma-separated; the first value is the polarity.
    #[serde(default)]
    pub tone: String,
    /// Semicolon-delimited records of `type#name#ISO_code#...` fields.
    #[serde(default)]
    pub locations: String,
    #[serde(default)]
    pub themes: String,
}

/// Wire access to the warehouse, kept behind a trait so the query builder
/// and row mapping are testable without a live backend.
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    async fn query(&self, sql: &str) -> Result<Vec<WarehouseRow>>;
}

/// Warehouse gateway speaking `POST {"query": ...}` → `{"rows": [...]}`.
pub struct RestWarehouseClient {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    rows: Vec<WarehouseRow>,
}

impl RestWarehouseClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl WarehouseClient for RestWarehouseClient {
    async fn query(&self, sql: &str) -> Result<Vec<WarehouseRow>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&QueryRequest { query: sql })
            .send()
            .await?
            .error_for_status()?;
        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("warehouse response: {}", e)))?;
        Ok(body.rows)
    }
}

pub struct WarehouseSearch {
    client: Arc<dyn WarehouseClient>,
    config: WarehouseConfig,
    available: AtomicBool,
}

impl WarehouseSearch {
    pub fn new(client: Arc<dyn WarehouseClient>, config: WarehouseConfig) -> Self {
        Self {
            client,
            config,
            available: AtomicBool::new(true),
        }
    }

    /// SQL text for one search call. The date window is centered on the
    /// reference date and spans `window_days` on each side, inclusive.
    fn build_query(
        &self,
        keywords: &[String],
        opts: &SearchOptions,
        reference: NaiveDate,
    ) -> String {
        let window = Duration::days(self.config.window_days);
        let start = reference - window;
        let end = reference + window;

        // URLs separate words with hyphens, not spaces, so spaces become
        // wildcards.
        let keyword_clause = keywords
            .iter()
            .map(|k| format!("document_identifier LIKE '%{}%'", like_pattern(k)))
            .collect::<Vec<_>>()
            .join(" OR ");

        let country_clause = if opts.countries.is_empty() {
            "1=1".to_string()
        } else {
            opts.countries
                .iter()
                .map(|c| format!("locations LIKE '%#{}#%'", sql_escape(c)))
                .collect::<Vec<_>>()
                .join(" OR ")
        };

        let trusted_clause = if self.config.trusted_domains.is_empty() {
            "1=1".to_string()
        } else {
            format!(
                "source_name IN ({})",
                quote_list(&self.config.trusted_domains)
            )
        };

        let excluded = EXCLUDED_SOURCES
            .iter()
            .map(|s| format!("'{}'", s))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "SELECT document_identifier, source_name, partition_date, tone, locations, themes \
             FROM {table} \
             WHERE partition_date BETWEEN '{start}' AND '{end}' \
             AND ({keyword_clause}) \
             AND ({country_clause}) \
             AND {trusted_clause} \
             AND source_name NOT IN ({excluded}) \
             AND document_identifier IS NOT NULL \
             AND LENGTH(document_identifier) < {max_url_len} \
             ORDER BY partition_date DESC \
             LIMIT {limit}",
            table = self.config.table,
            start = start,
            end = end,
            keyword_clause = keyword_clause,
            country_clause = country_clause,
            trusted_clause = trusted_clause,
            excluded = excluded,
            max_url_len = MAX_URL_LEN,
            limit = self.config.max_results,
        )
    }

    fn mark_unavailable(&self, reason: &str) {
        self.available.store(false, Ordering::Relaxed);
        warn!("⚠️ warehouse search marked unavailable: {}", reason);
    }

    fn row_to_candidate(row: WarehouseRow, targets: &[String]) -> Option<ArticleCandidate> {
        if row.document_identifier.trim().is_empty() {
            return None;
        }
        let country = extract_country(&row.locations, targets);
        Some(ArticleCandidate {
            url: row.document_identifier,
            source_domain: row.source_name,
            title: None,
            published_date: NaiveDate::parse_from_str(&row.partition_date, "%Y-%m-%d").ok(),
            tone_score: tone_polarity(&row.tone),
            raw_locations: row.locations,
            raw_themes: row.themes,
            country,
        })
    }
}

#[async_trait]
impl SearchStrategy for WarehouseSearch {
    fn name(&self) -> &str {
        "warehouse"
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

        let reference = opts.event_date.unwrap_or_else(|| Utc::now().date_naive());
        let sql = self.build_query(keywords, opts, reference);
        info!("🔍 warehouse search around {}", reference);

        let rows = match self.client.query(&sql).await {
            Ok(rows) => rows,
            Err(Error::Http(e)) => {
                let reason = format!("transport failure: {}", e);
                self.mark_unavailable(&reason);
                return Err(Error::StrategyUnavailable(reason));
            }
            Err(e) => {
                warn!("⚠️ warehouse query failed: {}", e);
                return Err(e);
            }
        };

        let candidates: Vec<ArticleCandidate> = rows
            .into_iter()
            .filter_map(|row| Self::row_to_candidate(row, &opts.countries))
            .collect();
        info!("✨ warehouse search returned {} candidates", candidates.len());
        Ok(candidates)
    }
}

fn sql_escape(value: &str) -> String {
    value.replace('\'', "''")
}

fn like_pattern(keyword: &str) -> String {
    sql_escape(&keyword.to_lowercase())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("%")
}

fn quote_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", sql_escape(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn tone_polarity(tone: &str) -> f64 {
    tone.split(',')
        .next()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0.0)
}

/// Pull the ISO country code (3rd `#`-delimited field) out of a
/// semicolon-delimited locations value, preferring any of the target
/// countries over the first one mentioned.
fn extract_country(locations: &str, targets: &[String]) -> String {
    let mut first = None;
    for entry in locations.split(';') {
        let mut fields = entry.split('#');
        let code = fields.nth(2).unwrap_or("").trim();
        if code.is_empty() {
            continue;
        }
        if targets.iter().any(|t| t == code) {
            return code.to_string();
        }
        if first.is_none() {
            first = Some(code.to_string());
        }
    }
    first.unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticClient {
        rows: Vec<WarehouseRow>,
    }

    #[async_trait]
    impl WarehouseClient for StaticClient {
        async fn query(&self, _sql: &str) -> Result<Vec<WarehouseRow>> {
            Ok(self.rows.clone())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl WarehouseClient for FailingClient {
        async fn query(&self, _sql: &str) -> Result<Vec<WarehouseRow>> {
            Err(Error::Warehouse("partition not found".to_string()))
        }
    }

    fn search_with(rows: Vec<WarehouseRow>) -> WarehouseSearch {
        WarehouseSearch::new(Arc::new(StaticClient { rows }), WarehouseConfig::default())
    }

    fn row(url: &str, source: &str, date: &str, tone: &str, locations: &str) -> WarehouseRow {
        WarehouseRow {
            document_identifier: url.to_string(),
            source_name: source.to_string(),
            partition_date: date.to_string(),
            tone: tone.to_string(),
            locations: locations.to_string(),
            themes: String::new(),
        }
    }

    #[test]
    fn date_window_is_inclusive_and_centered() {
        let search = search_with(Vec::new());
        let opts = SearchOptions::default();
        let keywords = vec!["tariff".to_string(), "China".to_string()];
        let sql = search.build_query(
            &keywords,
            &opts,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(sql.contains("partition_date BETWEEN '2023-12-28' AND '2024-01-05'"));
    }

    #[test]
    fn keyword_spaces_become_wildcards() {
        let search = search_with(Vec::new());
        let keywords = vec!["North Korea missile".to_string()];
        let sql = search.build_query(
            &keywords,
            &SearchOptions::default(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(sql.contains("document_identifier LIKE '%north%korea%missile%'"));
    }

    #[test]
    fn trusted_domains_are_anded_in() {
        let search = search_with(Vec::new());
        let sql = search.build_query(
            &["tariff".to_string()],
            &SearchOptions::default(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(sql.contains("source_name IN ('reuters.com'"));
        assert!(sql.contains("source_name NOT IN ('youtube.com'"));
    }

    #[test]
    fn country_filter_uses_hash_delimited_pattern() {
        let search = search_with(Vec::new());
        let opts = SearchOptions {
            countries: vec!["KR".to_string()],
            event_date: None,
        };
        let sql = search.build_query(
            &["tariff".to_string()],
            &opts,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(sql.contains("locations LIKE '%#KR#%'"));
    }

    #[test]
    fn extract_country_prefers_targets() {
        let locations = "1#United States#US#US#40.7#-74.0;1#China#CN#CH#39.9#116.4";
        assert_eq!(
            extract_country(locations, &["CN".to_string()]),
            "CN"
        );
        assert_eq!(extract_country(locations, &[]), "US");
        assert_eq!(extract_country("", &[]), "Unknown");
    }

    #[test]
    fn tone_takes_first_csv_value() {
        assert_eq!(tone_polarity("-3.5,2.1,0.4"), -3.5);
        assert_eq!(tone_polarity(""), 0.0);
        assert_eq!(tone_polarity("junk"), 0.0);
    }

    #[tokio::test]
    async fn rows_map_to_candidates() {
        let search = search_with(vec![
            row(
                "https://reuters.com/trade-talks",
                "reuters.com",
                "2024-01-02",
                "-1.5,3.0",
                "1#South Korea#KR#KS#37.5#127.0",
            ),
            row("", "reuters.com", "2024-01-02", "", ""),
        ]);
        let opts = SearchOptions {
            countries: vec!["KR".to_string()],
            event_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        };
        let candidates = search
            .search(&["trade talks".to_string()], &opts)
            .await
            .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].country, "KR");
        assert_eq!(candidates[0].tone_score, -1.5);
        assert_eq!(
            candidates[0].published_date,
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }

    #[tokio::test]
    async fn execution_failure_propagates_without_tripping_breaker() {
        let search =
            WarehouseSearch::new(Arc::new(FailingClient), WarehouseConfig::default());
        let result = search
            .search(&["tariff".to_string()], &SearchOptions::default())
            .await;
        assert!(matches!(result, Err(Error::Warehouse(_))));
        assert!(search.is_available());
    }
}
