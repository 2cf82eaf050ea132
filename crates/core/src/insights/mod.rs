//! Category-insight retrieval: cache, remote source, normalization and local
//! fallback, coordinated by [`orchestrator::InsightOrchestrator`].

pub mod cache;
pub mod fallback;
pub mod normalizer;
pub mod orchestrator;
pub mod source;

pub use cache::InsightCache;
pub use fallback::{CuratedFallback, FallbackSource};
pub use normalizer::{normalize, NO_INSIGHT_MESSAGE};
pub use orchestrator::InsightOrchestrator;
pub use source::{build_query, InsightSource, QUERY_SUFFIX};
