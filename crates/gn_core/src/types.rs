use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ISO 3166-1 alpha-2 country code, or `"Unknown"` when inference failed.
pub type CountryCode = String;

/// Caller-supplied search input. Read-only to the pipeline; per-country
/// scoping works on copies (see [`SearchParams::for_country`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub target_countries: Vec<CountryCode>,
}

impl SearchParams {
    /// Copy of these params scoped to a single target country.
    pub fn for_country(&self, country: &str) -> SearchParams {
        let mut scoped = self.clone();
        scoped.target_countries = vec![country.to_string()];
        scoped
    }
}

/// A raw search hit produced by one of the search backends. Immutable once
/// created; ownership moves stage to stage through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleCandidate {
    pub url: String,
    pub source_domain: String,
    /// Title as reported by the backend. The metadata warehouse has none.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub published_date: Option<NaiveDate>,
    /// Sentiment polarity from the metadata backend; 0.0 when unknown.
    #[serde(default)]
    pub tone_score: f64,
    #[serde(default)]
    pub raw_locations: String,
    #[serde(default)]
    pub raw_themes: String,
    /// Origin country inferred by the producing backend.
    pub country: CountryCode,
}

impl ArticleCandidate {
    /// Text used when scoring this candidate against a topic. Falls back to
    /// words recovered from the URL slug when the backend supplied no title
    /// (news URLs separate words with hyphens).
    pub fn display_text(&self) -> String {
        if let Some(title) = &self.title {
            if !title.trim().is_empty() {
                return title.trim().to_string();
            }
        }
        slug_words(&self.url)
    }
}

fn slug_words(url: &str) -> String {
    let path = url
        .split('#')
        .next()
        .and_then(|u| u.split('?').next())
        .unwrap_or("");
    let segment = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("");
    let segment = segment
        .rsplit_once('.')
        .map(|(stem, _ext)| stem)
        .unwrap_or(segment);
    segment
        .split(|c| c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A candidate together with its relevance score, handed from the filtering
/// stage to enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: ArticleCandidate,
    pub score: f32,
}

impl From<ArticleCandidate> for ScoredCandidate {
    fn from(candidate: ArticleCandidate) -> Self {
        Self {
            candidate,
            score: 0.0,
        }
    }
}

/// A fully enriched article: candidate metadata plus fetched body text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub source_domain: String,
    pub country: CountryCode,
    #[serde(default)]
    pub published_date: Option<NaiveDate>,
    #[serde(default)]
    pub tone_score: f64,
    pub title: String,
    #[serde(default)]
    pub title_translated: Option<String>,
    pub content: String,
    /// Content prefix, at most 500 characters.
    pub snippet: String,
    /// Cosine similarity against the topic embedding, in [-1, 1]; 0 when the
    /// candidate was never scored.
    #[serde(default)]
    pub relevance_score: f32,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub media_category: Option<String>,
}

/// Per-country slice of an orchestration report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryBucket {
    /// Coverage marker: [`CountryBucket::COVERED`] or
    /// [`CountryBucket::NO_RELEVANT_ARTICLES`].
    pub role: String,
    pub count: usize,
    pub articles: Vec<Article>,
}

impl CountryBucket {
    pub const COVERED: &'static str = "covered";
    pub const NO_RELEVANT_ARTICLES: &'static str = "no relevant articles";

    pub fn from_articles(articles: Vec<Article>) -> Self {
        let role = if articles.is_empty() {
            Self::NO_RELEVANT_ARTICLES
        } else {
            Self::COVERED
        };
        Self {
            role: role.to_string(),
            count: articles.len(),
            articles,
        }
    }
}

/// Keyed orchestration result, one bucket per requested country.
pub type CountryReport = BTreeMap<CountryCode, CountryBucket>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_country_scopes_a_single_target() {
        let params = SearchParams {
            keywords: vec!["tariff".to_string()],
            target_countries: vec!["US".to_string(), "KR".to_string()],
            ..Default::default()
        };
        let scoped = params.for_country("KR");
        assert_eq!(scoped.target_countries, vec!["KR".to_string()]);
        assert_eq!(scoped.keywords, params.keywords);
        // The original is untouched.
        assert_eq!(params.target_countries.len(), 2);
    }

    #[test]
    fn display_text_prefers_backend_title() {
        let candidate = ArticleCandidate {
            url: "https://example.com/some-slug".to_string(),
            source_domain: "example.com".to_string(),
            title: Some("Tariffs rise again".to_string()),
            published_date: None,
            tone_score: 0.0,
            raw_locations: String::new(),
            raw_themes: String::new(),
            country: "US".to_string(),
        };
        assert_eq!(candidate.display_text(), "Tariffs rise again");
    }

    #[test]
    fn display_text_recovers_words_from_url_slug() {
        let candidate = ArticleCandidate {
            url: "https://example.co.kr/news/trade-talks-resume-2024.html?ref=rss".to_string(),
            source_domain: "example.co.kr".to_string(),
            title: None,
            published_date: None,
            tone_score: 0.0,
            raw_locations: String::new(),
            raw_themes: String::new(),
            country: "KR".to_string(),
        };
        assert_eq!(candidate.display_text(), "trade talks resume 2024");
    }

    #[test]
    fn empty_bucket_carries_marker_role() {
        let bucket = CountryBucket::from_articles(Vec::new());
        assert_eq!(bucket.role, CountryBucket::NO_RELEVANT_ARTICLES);
        assert_eq!(bucket.count, 0);
    }
}
