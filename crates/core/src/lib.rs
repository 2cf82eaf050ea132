pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod insights;
pub mod presentation;

pub use catalog::ProductCatalog;
pub use domain::insight::{CategoryInsights, Provenance, ResolutionOutcome};
pub use domain::product::ProductRecord;
pub use errors::{CatalogError, FetchError, ResolveError};
pub use insights::{
    CuratedFallback, FallbackSource, InsightCache, InsightOrchestrator, InsightSource,
};
pub use presentation::{present_outcome, GenerationGuard, InsightPresenter, QueryTicket};
