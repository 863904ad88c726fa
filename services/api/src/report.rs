use clap::Args;
use lessonrank::catalog::ActivityCatalog;
use lessonrank::config::AppConfig;
use lessonrank::error::AppError;
use lessonrank::recommendation::{
    recommend, RecommendationRequest, RecommendationView, SCORING_CATEGORIES,
};
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct RecommendArgs {
    /// Activity catalog CSV (defaults to APP_CATALOG_PATH)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Target learner age
    #[arg(long)]
    pub(crate) age: Option<i64>,
    /// Accepted formats (unplugged, digital, hybrid)
    #[arg(long, value_delimiter = ',')]
    pub(crate) format: Vec<String>,
    /// Accepted Bloom levels
    #[arg(long, value_delimiter = ',')]
    pub(crate) bloom: Vec<String>,
    /// Target lesson length in minutes
    #[arg(long)]
    pub(crate) duration: Option<i64>,
    /// Resources available in the classroom
    #[arg(long, value_delimiter = ',')]
    pub(crate) resource: Vec<String>,
    /// Preferred topics
    #[arg(long, value_delimiter = ',')]
    pub(crate) topic: Vec<String>,
    /// Categories to flag as priorities
    #[arg(long, value_delimiter = ',')]
    pub(crate) priority: Vec<String>,
    /// Insert breaks between lesson plan members
    #[arg(long)]
    pub(crate) breaks: bool,
    /// Largest lesson plan to consider
    #[arg(long)]
    pub(crate) max_activities: Option<i64>,
    /// Number of results to print
    #[arg(long)]
    pub(crate) limit: Option<i64>,
}

impl RecommendArgs {
    fn to_request(&self) -> RecommendationRequest {
        RecommendationRequest {
            target_age: self.age,
            format: non_empty(&self.format),
            bloom_levels: non_empty(&self.bloom),
            target_duration: self.duration,
            available_resources: non_empty(&self.resource),
            preferred_topics: non_empty(&self.topic),
            priority_categories: non_empty(&self.priority),
            include_breaks: self.breaks,
            limit: self.limit,
            max_activity_count: self.max_activities,
        }
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let path = match args.catalog.clone() {
        Some(path) => path,
        None => AppConfig::load()?.catalog.path,
    };
    let catalog = ActivityCatalog::from_path(&path)?;
    let (criteria, priorities, options) = args.to_request().into_parts()?;

    let views: Vec<RecommendationView> =
        recommend(criteria, catalog.activities(), priorities, options)
            .into_iter()
            .map(RecommendationView::from)
            .collect();

    print!("{}", render_recommendations(&views, catalog.len()));
    Ok(())
}

pub(crate) fn run_categories() {
    print!("{}", render_categories());
}

pub(crate) fn render_recommendations(views: &[RecommendationView], catalog_size: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Recommendations: {} (catalog of {} activities)",
        views.len(),
        catalog_size
    );
    if views.is_empty() {
        let _ = writeln!(out, "  No activity matched the search");
        return out;
    }

    for (rank, view) in views.iter().enumerate() {
        let kind = if view.is_lesson_plan {
            "Lesson plan"
        } else {
            "Activity"
        };
        let _ = writeln!(
            out,
            "\n{}. [score {}] {}, {} min",
            rank + 1,
            view.score,
            kind,
            view.total_duration_minutes
        );

        for activity in &view.activities {
            let _ = writeln!(
                out,
                "   - {} ({} min, {}, {})",
                activity.label(),
                activity.midpoint_minutes(),
                activity.format,
                activity.bloom_level
            );
            if let Some(pause) = &activity.break_after {
                let _ = writeln!(out, "     break {} min: {}", pause.duration, pause.description);
            }
        }

        let breakdown = view
            .score_breakdown
            .values()
            .map(|score| {
                let flag = if score.is_priority { "*" } else { "" };
                format!("{} {}{}", score.category, score.score, flag)
            })
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "   scores: {}", breakdown);
    }

    out
}

pub(crate) fn render_categories() -> String {
    let mut out = String::from("Scoring categories\n");
    for definition in SCORING_CATEGORIES.iter() {
        let _ = writeln!(
            out,
            "  {:<20} impact {}  {}",
            definition.category.as_str(),
            definition.impact,
            definition.description
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonrank::recommendation::{
        recommend, Activity, ActivityFormat, ActivityId, ActivityTopic, BloomLevel, EnergyLevel,
        RecommendationOptions, SearchCriteria,
    };
    use std::collections::BTreeSet;

    fn sample(id: u32, name: &str) -> Activity {
        Activity {
            id: Some(ActivityId(id)),
            name: name.to_string(),
            description: String::new(),
            source: None,
            age_min: 9,
            age_max: 12,
            format: ActivityFormat::Unplugged,
            bloom_level: BloomLevel::Apply,
            duration_min_minutes: 20,
            duration_max_minutes: Some(30),
            resources_needed: BTreeSet::new(),
            topics: BTreeSet::from([ActivityTopic::Algorithms]),
            mental_load: Some(EnergyLevel::High),
            physical_energy: None,
            prep_time_minutes: None,
            cleanup_time_minutes: None,
            break_after: None,
        }
    }

    #[test]
    fn renders_plans_with_breaks_and_priorities() {
        let pool = vec![sample(1, "Sorting Networks"), sample(2, "Cipher Wheels")];
        let criteria = SearchCriteria {
            target_age: Some(10),
            target_duration: Some(60),
            ..SearchCriteria::default()
        };
        let views: Vec<_> = recommend(
            criteria,
            &pool,
            BTreeSet::from(["duration_fit".parse().expect("known priority")]),
            RecommendationOptions {
                include_breaks: true,
                max_activity_count: 2,
                limit: 10,
            },
        )
        .into_iter()
        .map(RecommendationView::from)
        .collect();

        let text = render_recommendations(&views, pool.len());

        assert!(text.starts_with("Recommendations: 3 (catalog of 2 activities)"));
        assert!(text.contains("Lesson plan, 60 min"));
        assert!(text.contains("#1 Sorting Networks (25 min, unplugged, apply)"));
        assert!(text.contains("break 10 min: Mental rest break after high cognitive load"));
        assert!(text.contains("duration_fit 100*"));
        assert_eq!(text.matches("break 10 min").count(), 1);
    }

    #[test]
    fn renders_empty_result_set() {
        let text = render_recommendations(&[], 0);
        assert!(text.contains("No activity matched the search"));
    }

    #[test]
    fn renders_every_category() {
        let text = render_categories();
        assert_eq!(text.lines().count(), 1 + SCORING_CATEGORIES.len());
        assert!(text.contains("bloom_level_match"));
        assert!(text.contains("impact 5"));
    }

    #[test]
    fn empty_flags_are_omitted_from_request() {
        let args = RecommendArgs {
            topic: vec!["patterns".to_string()],
            breaks: true,
            ..RecommendArgs::default()
        };
        let request = args.to_request();
        assert_eq!(request.format, None);
        assert_eq!(request.preferred_topics, Some(vec!["patterns".to_string()]));
        assert!(request.include_breaks);
    }
}
