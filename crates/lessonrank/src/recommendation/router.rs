use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use super::domain::{Activity, Break, CategoryScore, Recommendation, ScoreCategory};
use super::pipeline::recommend;
use super::request::RecommendationRequest;
use super::scoring::{CategoryDefinition, SCORING_CATEGORIES};
use crate::catalog::ActivityCatalog;
use crate::error::AppError;

/// Router builder exposing the recommendation endpoints over a shared catalog.
pub fn recommendation_router(catalog: Arc<ActivityCatalog>) -> Router {
    Router::new()
        .route("/api/v1/recommendations", post(recommend_handler))
        .route(
            "/api/v1/recommendations/categories",
            get(categories_handler),
        )
        .with_state(catalog)
}

/// Ranked candidate as rendered to callers. A break on a plan's final member is never rendered.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub activities: Vec<Activity>,
    pub score: u8,
    pub score_breakdown: BTreeMap<ScoreCategory, CategoryScore>,
    pub total_duration_minutes: u32,
    pub is_lesson_plan: bool,
}

impl From<Recommendation> for RecommendationView {
    fn from(recommendation: Recommendation) -> Self {
        let total_duration_minutes = recommendation.total_duration_minutes();
        let is_lesson_plan = recommendation.is_lesson_plan();
        let last = recommendation.activities.len().saturating_sub(1);

        let activities = recommendation
            .activities
            .into_iter()
            .enumerate()
            .map(|(index, mut activity)| {
                if index == last {
                    activity.break_after = None;
                }
                activity
            })
            .collect();

        Self {
            activities,
            score: recommendation.score.total_score,
            score_breakdown: recommendation.score.category_scores,
            total_duration_minutes,
            is_lesson_plan,
        }
    }
}

impl RecommendationView {
    pub fn breaks(&self) -> impl Iterator<Item = &Break> {
        self.activities
            .iter()
            .filter_map(|activity| activity.break_after.as_ref())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendationView>,
    pub total: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: &'static [CategoryDefinition],
    pub description: &'static str,
}

pub(crate) async fn recommend_handler(
    State(catalog): State<Arc<ActivityCatalog>>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let Json(request) = payload?;
    let (criteria, priorities, options) = request.into_parts()?;

    let pool = Arc::clone(&catalog);
    let ranked = tokio::task::spawn_blocking(move || {
        recommend(criteria, pool.activities(), priorities, options)
    })
    .await
    .map_err(|err| {
        error!(error = %err, "recommendation task failed");
        AppError::Ranking(err)
    })?;

    let recommendations: Vec<RecommendationView> =
        ranked.into_iter().map(RecommendationView::from).collect();

    info!(
        catalog = catalog.len(),
        returned = recommendations.len(),
        "recommendations served"
    );

    Ok(Json(RecommendationsResponse {
        total: recommendations.len(),
        recommendations,
        generated_at: Utc::now(),
    }))
}

pub(crate) async fn categories_handler() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: &SCORING_CATEGORIES,
        description: "Scoring categories used to evaluate activity recommendations",
    })
}
