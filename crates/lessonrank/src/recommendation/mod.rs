//! Category-based scoring and ranking of activities and multi-activity lesson plans.

pub mod breaks;
pub mod combinations;
pub mod domain;
pub mod filters;
pub mod pipeline;
pub mod request;
pub mod router;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use domain::{
    Activity, ActivityError, ActivityFormat, ActivityId, ActivityResource, ActivityTopic,
    BloomLevel, Break, CategoryScore, EnergyLevel, PriorityCategory, Recommendation,
    ScoreCategory, ScoreModel, SearchCriteria, UnknownTag,
};
pub use pipeline::{recommend, RecommendationOptions, RecommendationPipeline};
pub use request::{RecommendationRequest, RequestError};
pub use router::{recommendation_router, RecommendationView, RecommendationsResponse};
pub use scoring::{CategoryDefinition, ScoringEngine, SCORING_CATEGORIES};
