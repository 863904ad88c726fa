use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::breaks::assign_breaks;
use super::combinations::{lesson_plans, LESSON_PLAN_TOP_ACTIVITIES_LIMIT};
use super::domain::{Activity, PriorityCategory, Recommendation, ScoreModel, SearchCriteria};
use super::filters::apply_hard_filters;
use super::scoring::ScoringEngine;

pub const DEFAULT_MAX_ACTIVITY_COUNT: usize = 2;
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;

/// Per-call knobs that shape the candidate pool and the returned list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationOptions {
    pub include_breaks: bool,
    pub max_activity_count: usize,
    pub limit: usize,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self {
            include_breaks: false,
            max_activity_count: DEFAULT_MAX_ACTIVITY_COUNT,
            limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

struct Candidate<'a> {
    activities: Vec<Cow<'a, Activity>>,
    score: ScoreModel,
}

/// Two-pass ranking: duration-agnostic scoring of singles and lesson plans, break insertion,
/// then duration-aware rescoring and truncation.
pub struct RecommendationPipeline {
    criteria: SearchCriteria,
    options: RecommendationOptions,
    engine: ScoringEngine,
}

impl RecommendationPipeline {
    pub fn new(
        criteria: SearchCriteria,
        priorities: BTreeSet<PriorityCategory>,
        options: RecommendationOptions,
    ) -> Self {
        Self {
            criteria,
            options,
            engine: ScoringEngine::new(priorities),
        }
    }

    pub fn process(&self, activities: &[Activity]) -> Vec<Recommendation> {
        let usable = activities.iter().filter(|activity| match activity.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "skipping activity that cannot be ranked");
                false
            }
        });

        let filtered = apply_hard_filters(usable, &self.criteria);
        debug!(
            received = activities.len(),
            kept = filtered.len(),
            "hard filters applied"
        );

        let mut ranked = self.score_without_duration(&filtered);
        rank(&mut ranked);

        if self.options.include_breaks {
            for candidate in ranked.iter_mut().filter(|c| c.activities.len() > 1) {
                assign_breaks(&mut candidate.activities);
            }
        }

        for candidate in &mut ranked {
            candidate.score = self.score_with_duration(&candidate.activities);
        }
        rank(&mut ranked);
        ranked.truncate(self.options.limit);

        debug!(returned = ranked.len(), "recommendations ranked");

        ranked
            .into_iter()
            .map(|candidate| Recommendation {
                activities: candidate
                    .activities
                    .into_iter()
                    .map(Cow::into_owned)
                    .collect(),
                score: candidate.score,
            })
            .collect()
    }

    /// Singles in filter order, followed by lesson plans seeded from the leading activities.
    fn score_without_duration<'a>(&self, filtered: &[&'a Activity]) -> Vec<Candidate<'a>> {
        let mut candidates: Vec<Candidate<'a>> = filtered
            .iter()
            .map(|activity| Candidate {
                activities: vec![Cow::Borrowed(*activity)],
                score: self
                    .engine
                    .score_activity_without_duration(activity, &self.criteria),
            })
            .collect();

        if self.options.max_activity_count > 1 && filtered.len() > 1 {
            let plans = lesson_plans(filtered, self.options.max_activity_count);
            debug!(
                seeds = filtered.len().min(LESSON_PLAN_TOP_ACTIVITIES_LIMIT),
                plans = plans.len(),
                "lesson plans generated"
            );

            candidates.extend(plans.into_iter().map(|plan| Candidate {
                score: self
                    .engine
                    .score_sequence_without_duration(&plan, &self.criteria),
                activities: plan.into_iter().map(Cow::Borrowed).collect(),
            }));
        }

        candidates
    }

    fn score_with_duration(&self, activities: &[Cow<'_, Activity>]) -> ScoreModel {
        match activities {
            [single] => self.engine.score_activity(single, &self.criteria),
            members => self.engine.score_sequence(members, &self.criteria),
        }
    }
}

/// Stable sort, highest total first; ties keep their previous order.
fn rank(candidates: &mut [Candidate<'_>]) {
    candidates.sort_by(|a, b| b.score.total_score.cmp(&a.score.total_score));
}

/// Runs the full pipeline for one search.
pub fn recommend(
    criteria: SearchCriteria,
    activities: &[Activity],
    priorities: BTreeSet<PriorityCategory>,
    options: RecommendationOptions,
) -> Vec<Recommendation> {
    RecommendationPipeline::new(criteria, priorities, options).process(activities)
}
