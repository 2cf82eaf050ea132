use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    domain::insight::ResolutionOutcome,
    errors::ResolveError,
    insights::{
        cache::InsightCache, fallback::FallbackSource, normalizer::normalize,
        source::InsightSource,
    },
};

/// Coordinates cache lookup, a single remote fetch, normalization and local
/// fallback for one category at a time.
///
/// Malformed payloads are treated like any other remote failure: they fall
/// back to local insights and are never cached.
pub struct InsightOrchestrator<S, F> {
    source: S,
    fallback: F,
    cache: InsightCache,
}

impl<S, F> InsightOrchestrator<S, F> {
    pub fn new(source: S, fallback: F, cache: InsightCache) -> Self {
        Self { source, fallback, cache }
    }

    pub fn cache(&self) -> &InsightCache {
        &self.cache
    }
}

impl<S, F> InsightOrchestrator<S, F>
where
    S: InsightSource,
    F: FallbackSource,
{
    pub async fn resolve(&self, category: &str) -> Result<ResolutionOutcome, ResolveError> {
        if category.trim().is_empty() {
            return Err(ResolveError::InvalidArgument("category must not be empty".to_owned()));
        }

        let correlation_id = Uuid::new_v4().to_string();

        if let Some(insights) = self.cache.get(category) {
            info!(
                event_name = "insight.resolve.cache_hit",
                correlation_id = %correlation_id,
                category = %category,
                insight_count = insights.len(),
                "category insights served from cache"
            );
            return Ok(ResolutionOutcome::Cached(insights));
        }

        let fetched = self.source.fetch(category).await.and_then(|payload| normalize(&payload));
        match fetched {
            Ok(insights) => {
                if !self.cache.store(category, insights.clone()) {
                    if let Some(stored) = self.cache.get(category) {
                        info!(
                            event_name = "insight.resolve.store_lost",
                            correlation_id = %correlation_id,
                            category = %category,
                            insight_count = stored.len(),
                            "concurrent resolve cached this category first, serving its insights"
                        );
                        return Ok(ResolutionOutcome::Cached(stored));
                    }
                }
                info!(
                    event_name = "insight.resolve.fetched",
                    correlation_id = %correlation_id,
                    category = %category,
                    insight_count = insights.len(),
                    "category insights fetched from remote service"
                );
                Ok(ResolutionOutcome::Fetched(insights))
            }
            Err(error) => {
                warn!(
                    event_name = "insight.resolve.remote_failed",
                    correlation_id = %correlation_id,
                    category = %category,
                    error_class = error.class(),
                    error = %error,
                    "remote insight fetch failed, trying local fallback"
                );

                let insights = self.fallback.get(category);
                if insights.is_empty() {
                    warn!(
                        event_name = "insight.resolve.error",
                        correlation_id = %correlation_id,
                        category = %category,
                        "no local fallback insights available"
                    );
                    return Ok(ResolutionOutcome::Error);
                }

                info!(
                    event_name = "insight.resolve.fallback",
                    correlation_id = %correlation_id,
                    category = %category,
                    insight_count = insights.len(),
                    "category insights served from local fallback"
                );
                Ok(ResolutionOutcome::FallbackLocal(insights))
            }
        }
    }
}
