//! Bounded-concurrency article enrichment.
//!
//! Every candidate is fetched independently: one worker permit, one request
//! timeout, one outcome. A task that times out, fails extraction or comes
//! back too short simply drops its candidate; siblings never notice.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use gn_core::config::EnrichConfig;
use gn_core::{
    Article, ContentExtractor, MediaRegistry, ScoredCandidate, TranslationProvider,
};

/// Shorter extractions are 404 pages, paywalls or cookie walls.
const MIN_CONTENT_CHARS: usize = 100;

const SNIPPET_CHARS: usize = 500;

pub struct ParallelContentFetcher {
    extractor: Arc<dyn ContentExtractor>,
    translator: Option<Arc<dyn TranslationProvider>>,
    media: Arc<dyn MediaRegistry>,
    semaphore: Arc<Semaphore>,
    task_timeout: Duration,
}

impl ParallelContentFetcher {
    pub fn new(
        extractor: Arc<dyn ContentExtractor>,
        translator: Option<Arc<dyn TranslationProvider>>,
        media: Arc<dyn MediaRegistry>,
        config: &EnrichConfig,
    ) -> Self {
        Self {
            extractor,
            translator,
            media,
            semaphore: Arc::new(Semaphore::new(config.fetch_workers.max(1))),
            task_timeout: Duration::from_secs(config.fetch_timeout_secs),
        }
    }

    /// Enrich all candidates concurrently under the worker bound. Output
    /// order carries no meaning; sort by relevance downstream if it matters.
    pub async fn enrich(&self, candidates: Vec<ScoredCandidate>) -> Vec<Article> {
        let total = candidates.len();
        let tasks: Vec<_> = candidates
            .into_iter()
            .map(|scored| self.enrich_one(scored))
            .collect();
        let articles: Vec<Article> = join_all(tasks).await.into_iter().flatten().collect();
        info!("📰 enriched {}/{} candidates", articles.len(), total);
        articles
    }

    async fn enrich_one(&self, scored: ScoredCandidate) -> Option<Article> {
        let _permit = self.semaphore.acquire().await.ok()?;
        let candidate = scored.candidate;

        let extraction = match timeout(
            self.task_timeout,
            self.extractor.extract_with_title(&candidate.url),
        )
        .await
        {
            Ok(Ok(extraction)) => extraction,
            Ok(Err(e)) => {
                warn!("⚠️ extraction failed for {}: {}", candidate.url, e);
                return None;
            }
            Err(_) => {
                warn!(
                    "⚠️ extraction timed out after {:?} for {}",
                    self.task_timeout, candidate.url
                );
                return None;
            }
        };

        if extraction.content.chars().count() < MIN_CONTENT_CHARS {
            debug!("🗑️ dropping {} (content too short)", candidate.url);
            return None;
        }

        let title = if extraction.title.trim().is_empty() {
            candidate.source_domain.clone()
        } else {
            extraction.title.trim().to_string()
        };

        let title_translated = match &self.translator {
            Some(translator) => translator.translate(&title).await.ok(),
            None => None,
        };

        let hint = (candidate.country != "Unknown").then_some(candidate.country.as_str());
        let media_info = self.media.lookup(&candidate.source_domain, hint);
        let (media_type, media_category) = if media_info.is_unknown() {
            (None, None)
        } else {
            (Some(media_info.media_type), Some(media_info.category))
        };

        let snippet: String = extraction.content.chars().take(SNIPPET_CHARS).collect();

        Some(Article {
            url: candidate.url,
            source_domain: candidate.source_domain,
            country: candidate.country,
            published_date: candidate.published_date,
            tone_score: candidate.tone_score,
            title,
            title_translated,
            content: extraction.content,
            snippet,
            relevance_score: scored.score,
            media_type,
            media_category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use gn_core::{ArticleCandidate, Error, Extraction, Result};

    use crate::media::StaticMediaRegistry;

    fn long_content() -> String {
        "Negotiators from both delegations met behind closed doors for a third day, \
         trading draft schedules on industrial tariffs while farm groups waited outside."
            .repeat(2)
    }

    /// Extractor scripted per URL; also tracks peak concurrency.
    struct ScriptedExtractor {
        short_urls: Vec<String>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ScriptedExtractor {
        fn new(short_urls: Vec<String>) -> Self {
            Self {
                short_urls,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }

        fn peak(&self) -> usize {
            self.peak.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl ContentExtractor for ScriptedExtractor {
        async fn extract_with_title(&self, url: &str) -> Result<Extraction> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.short_urls.iter().any(|u| u == url) {
                return Ok(Extraction {
                    title: "stub".to_string(),
                    content: "paywalled".to_string(),
                });
            }
            Ok(Extraction {
                title: format!("Title for {}", url),
                content: long_content(),
            })
        }
    }

    struct UntitledExtractor;

    #[async_trait]
    impl ContentExtractor for UntitledExtractor {
        async fn extract_with_title(&self, _url: &str) -> Result<Extraction> {
            Ok(Extraction {
                title: String::new(),
                content: long_content(),
            })
        }
    }

    struct EchoTranslator;

    #[async_trait]
    impl TranslationProvider for EchoTranslator {
        async fn translate(&self, text: &str) -> Result<String> {
            Ok(format!("[ko] {}", text))
        }
    }

    struct BrokenTranslator;

    #[async_trait]
    impl TranslationProvider for BrokenTranslator {
        async fn translate(&self, _text: &str) -> Result<String> {
            Err(Error::Translation("model offline".to_string()))
        }
    }

    fn scored(url: &str) -> ScoredCandidate {
        ScoredCandidate {
            candidate: ArticleCandidate {
                url: url.to_string(),
                source_domain: "cnn.com".to_string(),
                title: None,
                published_date: None,
                tone_score: 0.0,
                raw_locations: String::new(),
                raw_themes: String::new(),
                country: "US".to_string(),
            },
            score: 0.5,
        }
    }

    fn fetcher_with(
        extractor: Arc<dyn ContentExtractor>,
        translator: Option<Arc<dyn TranslationProvider>>,
    ) -> ParallelContentFetcher {
        ParallelContentFetcher::new(
            extractor,
            translator,
            Arc::new(StaticMediaRegistry::new()),
            &EnrichConfig::default(),
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn short_content_candidates_are_dropped() {
        let short: Vec<String> = (0..3).map(|i| format!("http://x.com/short/{}", i)).collect();
        let extractor = Arc::new(ScriptedExtractor::new(short.clone()));
        let fetcher = fetcher_with(extractor.clone(), None);

        let mut candidates: Vec<ScoredCandidate> =
            (0..9).map(|i| scored(&format!("http://x.com/ok/{}", i))).collect();
        candidates.extend(short.iter().map(|u| scored(u)));
        assert_eq!(candidates.len(), 12);

        let articles = fetcher.enrich(candidates).await;
        assert_eq!(articles.len(), 9);
        assert!(articles.iter().all(|a| !a.content.is_empty()));
        // Worker pool of 10 never runs more than 10 tasks at once.
        assert!(extractor.peak() <= 10);
    }

    #[tokio::test]
    async fn snippet_is_bounded_and_title_carried() {
        let fetcher = fetcher_with(Arc::new(ScriptedExtractor::new(vec![])), None);
        let articles = fetcher.enrich(vec![scored("http://x.com/a")]).await;
        assert_eq!(articles.len(), 1);
        let article = &articles[0];
        assert!(article.snippet.chars().count() <= 500);
        assert!(article.content.starts_with(&article.snippet));
        assert_eq!(article.title, "Title for http://x.com/a");
        assert_eq!(article.relevance_score, 0.5);
    }

    #[tokio::test]
    async fn missing_title_falls_back_to_source_domain() {
        let fetcher = fetcher_with(Arc::new(UntitledExtractor), None);
        let articles = fetcher.enrich(vec![scored("http://x.com/a")]).await;
        assert_eq!(articles[0].title, "cnn.com");
    }

    #[tokio::test]
    async fn translation_failure_keeps_original_title() {
        let fetcher = fetcher_with(
            Arc::new(ScriptedExtractor::new(vec![])),
            Some(Arc::new(BrokenTranslator)),
        );
        let articles = fetcher.enrich(vec![scored("http://x.com/a")]).await;
        assert_eq!(articles[0].title, "Title for http://x.com/a");
        assert!(articles[0].title_translated.is_none());
    }

    #[tokio::test]
    async fn translation_success_fills_translated_title() {
        let fetcher = fetcher_with(
            Arc::new(ScriptedExtractor::new(vec![])),
            Some(Arc::new(EchoTranslator)),
        );
        let articles = fetcher.enrich(vec![scored("http://x.com/a")]).await;
        assert_eq!(
            articles[0].title_translated.as_deref(),
            Some("[ko] Title for http://x.com/a")
        );
    }

    #[tokio::test]
    async fn known_outlet_gets_media_fields() {
        let fetcher = fetcher_with(Arc::new(ScriptedExtractor::new(vec![])), None);
        let articles = fetcher.enrich(vec![scored("http://cnn.com/a")]).await;
        assert_eq!(articles[0].media_type.as_deref(), Some("private"));
        assert_eq!(articles[0].media_category.as_deref(), Some("broadcasting"));
    }
}
