//! Facade over the strategy chain: primary first, fallback second, one
//! backend's results per call.

use std::sync::Arc;

use tracing::{info, warn};

use gn_core::{ArticleCandidate, SearchParams};

use crate::dedup;
use crate::planner;
use crate::strategy::{SearchOptions, SearchStrategy};

/// Tries the primary strategy, falls back to the secondary on an empty
/// result, an open breaker or a failure. At most one strategy's results are
/// ever used for a single call: mixing both backends would mix their
/// precision/recall characteristics in one ranked list.
pub struct SearchCoordinator {
    primary: Arc<dyn SearchStrategy>,
    fallback: Arc<dyn SearchStrategy>,
}

impl SearchCoordinator {
    pub fn new(primary: Arc<dyn SearchStrategy>, fallback: Arc<dyn SearchStrategy>) -> Self {
        Self { primary, fallback }
    }

    /// Run one coordinated search. Never fails: strategy errors are logged
    /// and downgrade to the fallback (or to an empty result), so callers can
    /// always distinguish "no results" from a crash by the absence of one.
    pub async fn search(&self, params: &SearchParams) -> Vec<ArticleCandidate> {
        let keywords = planner::merge(params);
        if keywords.is_empty() {
            info!("🔍 nothing to search after merging parameters");
            return Vec::new();
        }
        let opts = SearchOptions {
            countries: params.target_countries.clone(),
            event_date: params.event_date,
        };

        if self.primary.is_available() {
            match self.primary.search(&keywords, &opts).await {
                Ok(candidates) if !candidates.is_empty() => {
                    return dedup::dedupe(candidates);
                }
                Ok(_) => {
                    info!(
                        "🔍 {} returned no results, trying {}",
                        self.primary.name(),
                        self.fallback.name()
                    );
                }
                Err(e) => {
                    warn!(
                        "⚠️ {} failed ({}), trying {}",
                        self.primary.name(),
                        e,
                        self.fallback.name()
                    );
                }
            }
        } else {
            info!(
                "🔍 {} unavailable, trying {}",
                self.primary.name(),
                self.fallback.name()
            );
        }

        if self.fallback.is_available() {
            match self.fallback.search(&keywords, &opts).await {
                Ok(candidates) => return dedup::dedupe(candidates),
                Err(e) => warn!("⚠️ {} failed: {}", self.fallback.name(), e),
            }
        }

        Vec::new()
    }
}
