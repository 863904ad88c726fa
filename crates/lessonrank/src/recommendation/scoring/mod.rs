mod categories;
mod rules;

pub use categories::{CategoryDefinition, PRIORITY_CATEGORY_MULTIPLIER, SCORING_CATEGORIES};

use std::collections::{BTreeMap, BTreeSet};

use super::domain::{Activity, CategoryScore, PriorityCategory, ScoreCategory, ScoreModel, SearchCriteria};

/// Stateless scorer that composes the category heuristics into score models.
///
/// The weighted total uses category impact only; the priority multiplier is reported on each
/// `CategoryScore` for display but does not change the ranking.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    priorities: BTreeSet<PriorityCategory>,
}

impl ScoringEngine {
    pub fn new(priorities: BTreeSet<PriorityCategory>) -> Self {
        Self { priorities }
    }

    pub fn score_activity(&self, activity: &Activity, criteria: &SearchCriteria) -> ScoreModel {
        let mut scores = self.individual_scores(activity, criteria);
        self.insert(
            &mut scores,
            rules::duration_fit(&[activity], criteria, &self.priorities),
        );
        self.model(scores, false, 1)
    }

    pub fn score_activity_without_duration(
        &self,
        activity: &Activity,
        criteria: &SearchCriteria,
    ) -> ScoreModel {
        let scores = self.individual_scores(activity, criteria);
        self.model(scores, false, 1)
    }

    /// Averages per-activity categories across members, then adds sequence-level cohesion
    /// and duration fit.
    pub fn score_sequence<A: AsRef<Activity>>(
        &self,
        activities: &[A],
        criteria: &SearchCriteria,
    ) -> ScoreModel {
        let mut scores = self.averaged_scores(activities, criteria);
        self.insert(&mut scores, rules::series_cohesion(activities));
        self.insert(
            &mut scores,
            rules::duration_fit(activities, criteria, &self.priorities),
        );
        self.model(scores, true, activities.len())
    }

    pub fn score_sequence_without_duration<A: AsRef<Activity>>(
        &self,
        activities: &[A],
        criteria: &SearchCriteria,
    ) -> ScoreModel {
        let mut scores = self.averaged_scores(activities, criteria);
        self.insert(&mut scores, rules::series_cohesion(activities));
        self.model(scores, true, activities.len())
    }

    fn individual_scores(
        &self,
        activity: &Activity,
        criteria: &SearchCriteria,
    ) -> BTreeMap<ScoreCategory, CategoryScore> {
        let mut scores = BTreeMap::new();
        self.insert(
            &mut scores,
            rules::age_appropriateness(activity, criteria, &self.priorities),
        );
        self.insert(
            &mut scores,
            rules::bloom_level_match(activity, criteria, &self.priorities),
        );
        self.insert(
            &mut scores,
            rules::topic_relevance(activity, criteria, &self.priorities),
        );
        scores
    }

    fn averaged_scores<A: AsRef<Activity>>(
        &self,
        activities: &[A],
        criteria: &SearchCriteria,
    ) -> BTreeMap<ScoreCategory, CategoryScore> {
        let mut totals: BTreeMap<ScoreCategory, u32> = BTreeMap::new();
        for activity in activities {
            for (category, score) in self.individual_scores(activity.as_ref(), criteria) {
                *totals.entry(category).or_default() += u32::from(score.score);
            }
        }

        let count = activities.len().max(1) as u32;
        totals
            .into_iter()
            .map(|(category, total)| {
                (
                    category,
                    rules::category_score(category, total / count, &self.priorities),
                )
            })
            .collect()
    }

    fn insert(&self, scores: &mut BTreeMap<ScoreCategory, CategoryScore>, score: CategoryScore) {
        scores.insert(score.category, score);
    }

    fn model(
        &self,
        category_scores: BTreeMap<ScoreCategory, CategoryScore>,
        is_sequence: bool,
        activity_count: usize,
    ) -> ScoreModel {
        ScoreModel {
            total_score: weighted_total(&category_scores),
            category_scores,
            priority_categories: self.priorities.clone(),
            is_sequence,
            activity_count,
        }
    }
}

/// Impact-weighted mean of the category scores, rounded down.
pub fn weighted_total(scores: &BTreeMap<ScoreCategory, CategoryScore>) -> u8 {
    let (weighted, weights) = scores.values().fold((0u32, 0u32), |(sum, weight), score| {
        let impact = u32::from(score.impact);
        (sum + u32::from(score.score) * impact, weight + impact)
    });

    if weights == 0 {
        return 0;
    }
    (weighted / weights).min(100) as u8
}
