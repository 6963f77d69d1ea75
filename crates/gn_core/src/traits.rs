//! Contracts for the external capabilities the pipeline consumes.

use async_trait::async_trait;

use crate::Result;

/// Title and body text pulled out of a fetched page. Both fields are
/// best-effort and may be empty.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub title: String,
    pub content: String,
}

#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Fetch a page and extract its title and body text. Ordinary fetch
    /// failures (network, non-2xx, unparseable HTML) surface as an empty
    /// extraction, not an error.
    async fn extract_with_title(&self, url: &str) -> Result<Extraction>;
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a piece of text. Must accept both short strings (titles) and
    /// longer topic descriptions.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Best-effort translation; callers keep the original text on error.
    async fn translate(&self, text: &str) -> Result<String>;
}

/// What the media registry knows about an outlet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInfo {
    pub name: String,
    pub media_type: String,
    pub category: String,
    pub country: String,
}

impl MediaInfo {
    pub const UNKNOWN: &'static str = "unknown";

    /// Sentinel returned when no outlet matches.
    pub fn unknown() -> Self {
        Self {
            name: Self::UNKNOWN.to_string(),
            media_type: Self::UNKNOWN.to_string(),
            category: Self::UNKNOWN.to_string(),
            country: "Unknown".to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.media_type == Self::UNKNOWN && self.category == Self::UNKNOWN
    }
}

pub trait MediaRegistry: Send + Sync {
    /// Look up an outlet by source name or domain. Never fails; returns the
    /// unknown sentinel when no match is found.
    fn lookup(&self, source_or_domain: &str, country_hint: Option<&str>) -> MediaInfo;
}
