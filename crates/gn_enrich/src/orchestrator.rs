//! Repeats the coordinated search once per target country and aggregates
//! the survivors into a keyed report.
//!
//! Countries run sequentially; that keeps the pipeline-wide seen-URL set
//! trivially consistent. Concurrency lives one level down, inside the
//! content fetcher's worker pool.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use gn_core::{
    Article, CountryBucket, CountryReport, EmbeddingProvider, ScoredCandidate, SearchParams,
};
use gn_inference::RelevanceFilter;
use gn_search::dedup::normalize_url;
use gn_search::SearchCoordinator;

use crate::fetcher::ParallelContentFetcher;

pub struct PerCountryOrchestrator {
    coordinator: Arc<SearchCoordinator>,
    relevance: Arc<RelevanceFilter>,
    fetcher: Arc<ParallelContentFetcher>,
    embeddings: Arc<dyn EmbeddingProvider>,
    per_country_cap: usize,
}

impl PerCountryOrchestrator {
    pub fn new(
        coordinator: Arc<SearchCoordinator>,
        relevance: Arc<RelevanceFilter>,
        fetcher: Arc<ParallelContentFetcher>,
        embeddings: Arc<dyn EmbeddingProvider>,
        per_country_cap: usize,
    ) -> Self {
        Self {
            coordinator,
            relevance,
            fetcher,
            embeddings,
            per_country_cap,
        }
    }

    /// One coordinated search per target country, in the order supplied.
    /// Always returns a well-formed report; countries without survivors get
    /// an empty bucket with the "no relevant articles" marker.
    pub async fn run(&self, params: &SearchParams, topic: &str) -> CountryReport {
        let topic_embedding = self.topic_embedding(topic).await;
        let mut seen: HashSet<String> = HashSet::new();
        let mut report = CountryReport::new();

        for country in &params.target_countries {
            let scoped = params.for_country(country);
            let candidates = self.coordinator.search(&scoped).await;
            info!("🌍 {}: {} candidates", country, candidates.len());

            let mut accepted = Vec::new();
            for candidate in candidates {
                if seen.contains(&normalize_url(&candidate.url)) {
                    // Already counted under an earlier country.
                    continue;
                }
                let text = candidate.display_text();
                let score = self.relevance.score(&text, topic_embedding.as_deref()).await;
                if self.relevance.accept(score) {
                    accepted.push(ScoredCandidate { candidate, score });
                }
            }

            sort_by_score_then_recency(&mut accepted);
            accepted.truncate(self.per_country_cap);
            for scored in &accepted {
                seen.insert(normalize_url(&scored.candidate.url));
            }

            let mut articles = self.fetcher.enrich(accepted).await;
            sort_articles(&mut articles);
            let bucket = CountryBucket::from_articles(articles);
            info!("🌍 {}: {} ({})", country, bucket.role, bucket.count);
            report.insert(country.clone(), bucket);
        }

        report
    }

    /// Single search without country buckets: coordinate once over the full
    /// parameter set, filter, cap and enrich.
    pub async fn search_topic(&self, params: &SearchParams, topic: &str) -> Vec<Article> {
        let topic_embedding = self.topic_embedding(topic).await;
        let candidates = self.coordinator.search(params).await;
        info!("🔍 topic search: {} candidates", candidates.len());

        let mut accepted = Vec::new();
        for candidate in candidates {
            let text = candidate.display_text();
            let score = self.relevance.score(&text, topic_embedding.as_deref()).await;
            if self.relevance.accept(score) {
                accepted.push(ScoredCandidate { candidate, score });
            }
        }
        sort_by_score_then_recency(&mut accepted);
        accepted.truncate(self.per_country_cap);

        let mut articles = self.fetcher.enrich(accepted).await;
        sort_articles(&mut articles);
        articles
    }

    /// The topic embedding is computed once per run. Failure here fails
    /// open: relevance filtering is an enhancement, never a gate.
    async fn topic_embedding(&self, topic: &str) -> Option<Vec<f32>> {
        match self.embeddings.embed(topic).await {
            Ok(vector) if !vector.is_empty() => Some(vector),
            Ok(_) => {
                warn!("⚠️ empty topic embedding, passing all candidates");
                None
            }
            Err(e) => {
                warn!("⚠️ topic embedding failed ({}), passing all candidates", e);
                None
            }
        }
    }
}

fn sort_by_score_then_recency(scored: &mut [ScoredCandidate]) {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.candidate.published_date.cmp(&a.candidate.published_date))
    });
}

/// The fetcher guarantees no ordering, so re-sort for stable output.
fn sort_articles(articles: &mut [Article]) {
    articles.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.published_date.cmp(&a.published_date))
    });
}
