//! Configuration for the retrieval pipeline.
//!
//! Every knob has a working default; a JSON config file and CLI flags both
//! override field by field.

use serde::{Deserialize, Serialize};

/// Full-text document search backend (primary strategy).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSearchConfig {
    /// Search endpoint issuing `query`/`mode`/`maxrecords`/`format`/`sort`/
    /// `timespan` GET requests.
    pub base_url: String,

    /// Rolling window understood by the backend (its own unit, e.g. "3m" for
    /// three months), not an absolute date range.
    pub timespan: String,

    /// Maximum records requested per call. Default: 250.
    pub max_records: u32,

    /// Request timeout in seconds. Default: 20.
    pub timeout_secs: u64,
}

impl Default for DocumentSearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.gdeltproject.org/api/v2/doc/doc".to_string(),
            timespan: "3m".to_string(),
            max_records: 250,
            timeout_secs: 20,
        }
    }
}

/// Historical metadata warehouse (fallback strategy).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    /// Query endpoint of the warehouse gateway.
    pub endpoint: String,

    /// Time-partitioned metadata table to query.
    pub table: String,

    /// Days searched on each side of the event date. Default: 4.
    pub window_days: i64,

    /// Row limit per query. Default: 100.
    pub max_results: u32,

    /// Source domains every query is restricted to. The warehouse has no
    /// article text to verify against, so it trades recall for precision.
    pub trusted_domains: Vec<String>,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9040/query".to_string(),
            table: "news_events.article_metadata".to_string(),
            window_days: 4,
            max_results: 100,
            trusted_domains: default_trusted_domains(),
        }
    }
}

fn default_trusted_domains() -> Vec<String> {
    [
        "reuters.com",
        "apnews.com",
        "bbc.com",
        "bbc.co.uk",
        "theguardian.com",
        "cnn.com",
        "nytimes.com",
        "washingtonpost.com",
        "aljazeera.com",
        "france24.com",
        "lemonde.fr",
        "dw.com",
        "nhk.or.jp",
        "asahi.com",
        "chosun.com",
        "koreaherald.com",
        "scmp.com",
        "chinadaily.com.cn",
        "globaltimes.cn",
        "tass.com",
        "timesofindia.com",
        "abc.net.au",
        "cbc.ca",
        "folha.uol.com.br",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Relevance filtering against the topic embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceConfig {
    /// Minimum cosine similarity a candidate must reach. Deliberately
    /// tunable; the steady-state value is still being calibrated. Default:
    /// 0.15.
    pub threshold: f32,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self { threshold: 0.15 }
    }
}

/// Enrichment stage: body fetch, translation, per-country capping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Top-ranked articles kept per target country. Default: 5.
    pub per_country_cap: usize,

    /// Concurrent body-fetch workers. Default: 10.
    pub fetch_workers: usize,

    /// Per-task fetch timeout in seconds; one slow page never stalls the
    /// batch. Default: 15.
    pub fetch_timeout_secs: u64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            per_country_cap: 5,
            fetch_workers: 10,
            fetch_timeout_secs: 15,
        }
    }
}

/// Embedding / translation provider endpoints (OpenAI-compatible).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible API (`/embeddings`,
    /// `/chat/completions` are appended).
    pub base_url: String,

    pub embedding_model: String,

    pub chat_model: String,

    /// Bearer token; local runtimes need none.
    pub api_key: Option<String>,

    /// Language titles are translated into. Empty disables translation.
    pub translate_to: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            chat_model: "qwen2.5".to_string(),
            api_key: None,
            translate_to: "English".to_string(),
        }
    }
}

/// Aggregate configuration, loadable from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub document: DocumentSearchConfig,
    pub warehouse: WarehouseConfig,
    pub relevance: RelevanceConfig,
    pub enrich: EnrichConfig,
    pub providers: ProviderConfig,
}

impl AppConfig {
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
