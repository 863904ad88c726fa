use std::collections::BTreeSet;

use super::common::*;
use crate::recommendation::domain::{
    ActivityFormat, ActivityId, ActivityTopic, BloomLevel, EnergyLevel, PriorityCategory,
    Recommendation, ScoreCategory, SearchCriteria,
};
use crate::recommendation::pipeline::{recommend, RecommendationOptions};

fn options(max_activity_count: usize, limit: usize, include_breaks: bool) -> RecommendationOptions {
    RecommendationOptions {
        include_breaks,
        max_activity_count,
        limit,
    }
}

fn ids(recommendation: &Recommendation) -> Vec<u32> {
    recommendation
        .activities
        .iter()
        .filter_map(|activity| activity.id.map(|id| id.0))
        .collect()
}

#[test]
fn empty_catalog_yields_nothing() {
    let results = recommend(criteria(), &[], BTreeSet::new(), RecommendationOptions::default());
    assert!(results.is_empty());
}

#[test]
fn empty_criteria_ranks_everything() {
    let pool = vec![activity(1).build(), activity(2).build()];
    let results = recommend(
        SearchCriteria::default(),
        &pool,
        BTreeSet::new(),
        options(2, 10, false),
    );

    // Two singles plus one pair.
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|result| result.score.total_score <= 100));
}

#[test]
fn limit_is_respected() {
    let pool: Vec<_> = (1..=6).map(|id| activity(id).build()).collect();

    let results = recommend(criteria(), &pool, BTreeSet::new(), options(3, 4, true));
    assert_eq!(results.len(), 4);

    let none = recommend(criteria(), &pool, BTreeSet::new(), options(3, 0, true));
    assert!(none.is_empty());
}

#[test]
fn single_activity_budget_skips_lesson_plans() {
    let pool: Vec<_> = (1..=4).map(|id| activity(id).build()).collect();
    let results = recommend(criteria(), &pool, BTreeSet::new(), options(1, 50, false));

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|result| !result.is_lesson_plan()));
}

#[test]
fn fitting_lesson_plan_outranks_short_singles() {
    let pool = vec![activity(1).build(), activity(2).build()];
    let search = SearchCriteria {
        target_duration: Some(60),
        ..criteria()
    };

    let results = recommend(search, &pool, BTreeSet::new(), options(2, 10, false));

    let top = &results[0];
    assert!(top.score.is_sequence);
    assert_eq!(ids(top), vec![1, 2]);
    assert_eq!(top.score.total_score, 89);
    assert_eq!(results[1].score.total_score, 78);
}

#[test]
fn rescoring_counts_inserted_breaks() {
    let pool = vec![
        activity(1).mental_load(EnergyLevel::High).build(),
        activity(2).build(),
    ];
    let search = SearchCriteria {
        target_duration: Some(60),
        ..criteria()
    };

    let results = recommend(search, &pool, BTreeSet::new(), options(2, 10, true));

    let plan = results
        .iter()
        .find(|result| result.is_lesson_plan())
        .expect("lesson plan ranked");
    assert_eq!(plan.total_duration_minutes(), 70);
    let duration = plan
        .score
        .category(ScoreCategory::DurationFit)
        .expect("duration scored");
    assert_eq!(duration.score, 83);
    assert_eq!(plan.score.total_score, 86);
    assert!(pool.iter().all(|activity| activity.break_after.is_none()));
}

#[test]
fn understand_then_apply_plan_earns_progression_bonus() {
    let pool = vec![
        activity(1).bloom(BloomLevel::Understand).build(),
        activity(2)
            .bloom(BloomLevel::Apply)
            .topics(&[ActivityTopic::Algorithms, ActivityTopic::Patterns])
            .build(),
    ];

    let results = recommend(criteria(), &pool, BTreeSet::new(), options(2, 10, false));

    let plan = results
        .iter()
        .find(|result| result.is_lesson_plan())
        .expect("lesson plan ranked");
    assert_eq!(ids(plan), vec![1, 2]);
    let cohesion = plan
        .score
        .category(ScoreCategory::SeriesCohesion)
        .expect("cohesion scored");
    assert_eq!(cohesion.score, 75);
}

#[test]
fn breaks_attach_to_first_member_only() {
    let pool = vec![
        activity(1)
            .cleanup(10)
            .mental_load(EnergyLevel::High)
            .format(ActivityFormat::Unplugged)
            .build(),
        activity(2).format(ActivityFormat::Digital).build(),
    ];

    let results = recommend(
        SearchCriteria::default(),
        &pool,
        BTreeSet::new(),
        options(2, 10, true),
    );

    let plan = results
        .iter()
        .find(|result| result.is_lesson_plan())
        .expect("lesson plan ranked");
    let pause = plan.activities[0]
        .break_after
        .as_ref()
        .expect("break after first member");
    assert_eq!(pause.duration, 25);
    assert_eq!(pause.reasons.len(), 3);
    assert!(plan.activities[1].break_after.is_none());

    let singles: Vec<_> = results.iter().filter(|r| !r.is_lesson_plan()).collect();
    assert_eq!(singles.len(), 2);
    assert!(singles
        .iter()
        .all(|single| single.activities[0].break_after.is_none()));
}

#[test]
fn breaks_are_omitted_unless_requested() {
    let pool = vec![
        activity(1).mental_load(EnergyLevel::High).build(),
        activity(2).build(),
    ];
    let results = recommend(criteria(), &pool, BTreeSet::new(), options(2, 10, false));
    assert!(results
        .iter()
        .flat_map(|result| &result.activities)
        .all(|activity| activity.break_after.is_none()));
}

#[test]
fn no_plan_ends_with_a_break() {
    let pool: Vec<_> = (1..=5)
        .map(|id| {
            activity(id)
                .mental_load(EnergyLevel::High)
                .physical_energy(EnergyLevel::High)
                .cleanup(id)
                .build()
        })
        .collect();

    let results = recommend(
        SearchCriteria::default(),
        &pool,
        BTreeSet::new(),
        options(4, 500, true),
    );

    // 5 singles + C(5,2) + C(5,3) + C(5,4)
    assert_eq!(results.len(), 5 + 10 + 10 + 5);
    for result in results.iter().filter(|r| r.is_lesson_plan()) {
        let (last, leading) = result.activities.split_last().expect("non-empty plan");
        assert!(last.break_after.is_none());
        assert!(leading.iter().all(|member| member.break_after.is_some()));
    }
}

#[test]
fn lesson_plans_are_seeded_from_first_twenty_in_filter_order() {
    let mut pool: Vec<_> = (1..=20).map(|id| activity(id).ages(14, 16).build()).collect();
    pool.push(activity(21).build());
    pool.push(activity(22).build());
    let search = SearchCriteria {
        target_age: Some(12),
        ..SearchCriteria::default()
    };

    let results = recommend(search, &pool, BTreeSet::new(), options(2, 500, false));

    assert_eq!(results.len(), 22 + 190);
    // The best single matches are filtered last, so they only ever appear alone.
    let singles: Vec<_> = results.iter().filter(|r| !r.is_lesson_plan()).collect();
    assert_eq!(ids(singles[0]), vec![21]);
    assert_eq!(ids(singles[1]), vec![22]);
    assert!(results
        .iter()
        .filter(|result| result.is_lesson_plan())
        .all(|result| ids(result).iter().all(|&id| id <= 20)));
}

#[test]
fn priorities_are_reported_but_do_not_reorder() {
    let pool: Vec<_> = vec![
        activity(1).ages(13, 16).build(),
        activity(2).topics(&[ActivityTopic::Patterns, ActivityTopic::Algorithms]).build(),
        activity(3).duration(25, None).build(),
    ];
    let priorities = BTreeSet::from([PriorityCategory::AgeAppropriateness]);

    let plain = recommend(criteria(), &pool, BTreeSet::new(), options(2, 10, false));
    let flagged = recommend(criteria(), &pool, priorities.clone(), options(2, 10, false));

    let plain_totals: Vec<_> = plain.iter().map(|r| r.score.total_score).collect();
    let flagged_totals: Vec<_> = flagged.iter().map(|r| r.score.total_score).collect();
    assert_eq!(plain_totals, flagged_totals);
    assert!(flagged
        .iter()
        .all(|result| result.score.priority_categories == priorities));
    let age = flagged[0]
        .score
        .category(ScoreCategory::AgeAppropriateness)
        .expect("age scored");
    assert!(age.is_priority);
    assert_eq!(age.priority_multiplier, 2.0);
}

#[test]
fn malformed_activities_are_skipped() {
    let mut broken = activity(2).build();
    broken.age_min = 15;
    broken.age_max = 9;
    let pool = vec![activity(1).build(), broken, activity(3).build()];

    let results = recommend(
        SearchCriteria::default(),
        &pool,
        BTreeSet::new(),
        options(2, 10, false),
    );

    assert_eq!(results.len(), 3);
    assert!(results
        .iter()
        .all(|result| !result.activities.iter().any(|a| a.id == Some(ActivityId(2)))));
}

#[test]
fn extreme_durations_rank_without_overflow() {
    let pool = vec![
        activity(1)
            .duration(3_000_000_000, Some(3_000_000_000))
            .mental_load(EnergyLevel::High)
            .cleanup(u32::MAX)
            .build(),
        activity(2).duration(1_000_000_000, Some(u32::MAX)).build(),
    ];
    let search = SearchCriteria {
        target_duration: Some(4_000_000_000),
        ..SearchCriteria::default()
    };

    let results = recommend(search, &pool, BTreeSet::new(), options(2, 10, true));

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|result| result.score.total_score <= 100));

    let plan = results
        .iter()
        .find(|result| result.is_lesson_plan())
        .expect("lesson plan ranked");
    let pause = plan.activities[0]
        .break_after
        .as_ref()
        .expect("break after first member");
    assert_eq!(pause.duration, u32::MAX);
    assert_eq!(plan.total_duration_minutes(), u32::MAX);

    let single = results
        .iter()
        .find(|result| ids(result) == vec![1])
        .expect("single ranked");
    let duration = single
        .score
        .category(ScoreCategory::DurationFit)
        .expect("duration scored");
    assert_eq!(duration.score, 75);
}

#[test]
fn scores_stay_within_bounds() {
    let pool: Vec<_> = (1..=6)
        .map(|id| {
            activity(id)
                .ages(6 + id as u8, 9 + id as u8)
                .duration(10 * id, Some(12 * id))
                .build()
        })
        .collect();
    let search = SearchCriteria {
        target_age: Some(10),
        target_duration: Some(40),
        bloom_levels: Some(vec![BloomLevel::Remember, BloomLevel::Understand]),
        ..SearchCriteria::default()
    };

    let results = recommend(search, &pool, BTreeSet::new(), options(5, 1000, true));

    assert!(!results.is_empty());
    for result in &results {
        assert!(result.score.total_score <= 100);
        assert!(result
            .score
            .category_scores
            .values()
            .all(|category| category.score <= 100));
    }
    assert!(results
        .windows(2)
        .all(|pair| pair[0].score.total_score >= pair[1].score.total_score));
}
