//! Scores candidate titles against a topic embedding.
//!
//! Failure handling is asymmetric on purpose. When the topic embedding
//! itself is missing the whole corpus passes unscored (the filter is a
//! quality enhancement, not a correctness gate). When a single title fails
//! to embed, that one candidate scores 0.0, so a flaky provider does not
//! let unscored junk through at the fail-open rate.

use std::sync::Arc;

use tracing::warn;

use gn_core::{cosine_similarity, EmbeddingProvider};

pub struct RelevanceFilter {
    provider: Arc<dyn EmbeddingProvider>,
    threshold: f32,
}

impl RelevanceFilter {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, threshold: f32) -> Self {
        Self {
            provider,
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Score a title against the topic embedding. Returns 1.0 when the topic
    /// embedding is absent, 0.0 when this title fails to embed or either
    /// vector has zero norm, cosine similarity in [-1, 1] otherwise.
    pub async fn score(&self, title: &str, topic_embedding: Option<&[f32]>) -> f32 {
        let Some(topic) = topic_embedding else {
            return 1.0;
        };
        match self.provider.embed(title).await {
            Ok(vector) => cosine_similarity(topic, &vector),
            Err(e) => {
                warn!("⚠️ title embedding failed ({}), scoring 0.0: {}", e, title);
                0.0
            }
        }
    }

    pub fn accept(&self, score: f32) -> bool {
        score >= self.threshold
    }
}
