//! The recommendation engine: per-country scoring, categorical
//! classification, the hierarchical category index, and the
//! graceful-degradation resolver that relaxes criteria when no exact
//! match exists.

pub mod classify;
pub mod domain;
pub mod index;
pub mod normalize;
pub mod resolver;
mod router;
pub mod scoring;
mod service;

pub use router::recommendation_router;
pub use service::{
    RankedCountry, RecommendError, RecommendationReport, RecommendationRequest,
    RecommendationService,
};
