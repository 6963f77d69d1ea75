use async_trait::async_trait;
use chrono::NaiveDate;

use gn_core::{ArticleCandidate, Result};

/// Extra filters a strategy may honor beyond the keyword list.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Restrict hits to these origin countries (empty = no restriction).
    pub countries: Vec<String>,
    /// Center of the date window for backends that search absolute dates.
    pub event_date: Option<NaiveDate>,
}

/// A search backend the coordinator can try.
///
/// Availability is a per-instance circuit breaker: once a transport-level
/// failure (timeout, non-2xx) is observed, `is_available` stays false for
/// the rest of the process so a broken backend is never retried per request.
#[async_trait]
pub trait SearchStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn is_available(&self) -> bool;

    /// Run one search. Transport failures return
    /// [`gn_core::Error::StrategyUnavailable`] after tripping the breaker;
    /// a clean zero-match outcome is `Ok(vec![])`, which is not an error.
    async fn search(
        &self,
        keywords: &[String],
        opts: &SearchOptions,
    ) -> Result<Vec<ArticleCandidate>>;
}
