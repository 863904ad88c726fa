use std::collections::{BTreeSet, HashSet};

use super::super::domain::{
    total_duration_minutes, Activity, CategoryScore, PriorityCategory, ScoreCategory,
    SearchCriteria,
};
use super::categories::PRIORITY_CATEGORY_MULTIPLIER;

/// Distance in years beyond the age range at which the age score reaches zero.
pub(crate) const AGE_MAX_DISTANCE: u32 = 5;
/// Largest deviation from the target duration, as a fraction of it, that still earns points.
const DURATION_MAX_DEVIATION_PERCENT: u32 = 50;
const SCORE_MAX: u32 = 100;

pub(crate) fn category_score(
    category: ScoreCategory,
    raw: u32,
    priorities: &BTreeSet<PriorityCategory>,
) -> CategoryScore {
    let is_priority = priorities
        .iter()
        .any(|priority| priority.category() == category);

    CategoryScore {
        category,
        score: raw.min(SCORE_MAX) as u8,
        impact: category.impact(),
        priority_multiplier: if is_priority {
            PRIORITY_CATEGORY_MULTIPLIER
        } else {
            1.0
        },
        is_priority,
    }
}

pub(crate) fn age_appropriateness(
    activity: &Activity,
    criteria: &SearchCriteria,
    priorities: &BTreeSet<PriorityCategory>,
) -> CategoryScore {
    let raw = match criteria.target_age {
        None => 0,
        Some(target) if (activity.age_min..=activity.age_max).contains(&target) => SCORE_MAX,
        Some(target) => {
            let distance = if target < activity.age_min {
                u32::from(activity.age_min - target)
            } else {
                u32::from(target - activity.age_max)
            };
            if distance <= AGE_MAX_DISTANCE {
                (AGE_MAX_DISTANCE - distance) * SCORE_MAX / AGE_MAX_DISTANCE
            } else {
                0
            }
        }
    };

    category_score(ScoreCategory::AgeAppropriateness, raw, priorities)
}

pub(crate) fn bloom_level_match(
    activity: &Activity,
    criteria: &SearchCriteria,
    priorities: &BTreeSet<PriorityCategory>,
) -> CategoryScore {
    let raw = criteria
        .bloom_levels
        .iter()
        .flatten()
        .map(|target| match target.rank().abs_diff(activity.bloom_level.rank()) {
            0 => SCORE_MAX,
            1 => SCORE_MAX / 2,
            _ => 0,
        })
        .max()
        .unwrap_or(0);

    category_score(ScoreCategory::BloomLevelMatch, raw, priorities)
}

/// Coverage of the preferred topic set, not precision of the activity's own topics.
pub(crate) fn topic_relevance(
    activity: &Activity,
    criteria: &SearchCriteria,
    priorities: &BTreeSet<PriorityCategory>,
) -> CategoryScore {
    let preferred: HashSet<_> = criteria.preferred_topics.iter().flatten().collect();

    let raw = if preferred.is_empty() || activity.topics.is_empty() {
        0
    } else {
        let matches = preferred
            .iter()
            .filter(|topic| activity.topics.contains(**topic))
            .count() as u32;
        matches * SCORE_MAX / preferred.len() as u32
    };

    category_score(ScoreCategory::TopicRelevance, raw, priorities)
}

/// Scores midpoint durations plus non-final breaks against the target duration.
pub(crate) fn duration_fit<A: AsRef<Activity>>(
    activities: &[A],
    criteria: &SearchCriteria,
    priorities: &BTreeSet<PriorityCategory>,
) -> CategoryScore {
    let total = total_duration_minutes(activities);

    let raw = match criteria.target_duration {
        Some(target) if target > 0 && total > 0 => {
            let deviation = u64::from(total.abs_diff(target));
            let target = u64::from(target);
            let score_max = u64::from(SCORE_MAX);
            if deviation * score_max <= target * u64::from(DURATION_MAX_DEVIATION_PERCENT) {
                ((target - deviation) * score_max / target) as u32
            } else {
                0
            }
        }
        _ => 0,
    };

    category_score(ScoreCategory::DurationFit, raw, priorities)
}

/// Topic continuity between neighbours plus a bonus for non-decreasing Bloom levels.
/// Never eligible for priority weighting.
pub(crate) fn series_cohesion<A: AsRef<Activity>>(activities: &[A]) -> CategoryScore {
    let category = ScoreCategory::SeriesCohesion;
    let no_priorities = BTreeSet::new();

    if activities.len() < 2 {
        let lone = u32::from(category.impact()) * 20;
        return category_score(category, lone, &no_priorities);
    }

    let pairs = activities.len() - 1;
    let overlap: f64 = activities
        .windows(2)
        .map(|pair| {
            let current = &pair[0].as_ref().topics;
            let next = &pair[1].as_ref().topics;
            if current.is_empty() || next.is_empty() {
                return 0.0;
            }
            let shared = current.intersection(next).count() as f64;
            let union = current.union(next).count() as f64;
            shared / union
        })
        .sum();
    let topic_points = overlap / pairs as f64 * 50.0;

    let progressive = activities
        .windows(2)
        .all(|pair| pair[0].as_ref().bloom_level <= pair[1].as_ref().bloom_level);
    let progression_points = if progressive { 50.0 } else { 25.0 };

    let raw = (topic_points + progression_points) as u32;
    category_score(category, raw, &no_priorities)
}
