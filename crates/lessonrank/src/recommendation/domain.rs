use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActivityId(pub u32);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a raw tag does not belong to one of the closed vocabularies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {vocabulary} '{value}' (expected one of: {expected})")]
pub struct UnknownTag {
    pub vocabulary: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! tag_vocabulary {
    ($(#[$meta:meta])* $name:ident, $label:literal, { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownTag;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let normalized = raw.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str() == normalized)
                    .ok_or_else(|| UnknownTag {
                        vocabulary: $label,
                        value: raw.to_string(),
                        expected: Self::ALL
                            .iter()
                            .map(|candidate| candidate.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

tag_vocabulary!(
    /// Delivery format of an activity.
    ActivityFormat, "format", {
        Unplugged => "unplugged",
        Digital => "digital",
        Hybrid => "hybrid",
    }
);

tag_vocabulary!(
    /// Bloom's taxonomy levels, declared in canonical order.
    BloomLevel, "bloom level", {
        Remember => "remember",
        Understand => "understand",
        Apply => "apply",
        Analyze => "analyze",
        Evaluate => "evaluate",
        Create => "create",
    }
);

tag_vocabulary!(
    /// Computational thinking topics an activity can cover.
    ActivityTopic, "topic", {
        Decomposition => "decomposition",
        Patterns => "patterns",
        Abstraction => "abstraction",
        Algorithms => "algorithms",
    }
);

tag_vocabulary!(
    /// Classroom resources an activity may require.
    ActivityResource, "resource", {
        Computers => "computers",
        Tablets => "tablets",
        Handouts => "handouts",
        Blocks => "blocks",
        Electronics => "electronics",
        Stationery => "stationery",
    }
);

tag_vocabulary!(
    EnergyLevel, "energy level", {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

tag_vocabulary!(
    /// Categories a caller may flag as important for a search.
    PriorityCategory, "priority category", {
        AgeAppropriateness => "age_appropriateness",
        TopicRelevance => "topic_relevance",
        DurationFit => "duration_fit",
        BloomLevelMatch => "bloom_level_match",
    }
);

tag_vocabulary!(
    /// Every dimension a candidate can be scored on.
    ScoreCategory, "score category", {
        AgeAppropriateness => "age_appropriateness",
        BloomLevelMatch => "bloom_level_match",
        TopicRelevance => "topic_relevance",
        DurationFit => "duration_fit",
        SeriesCohesion => "series_cohesion",
    }
);

impl BloomLevel {
    /// Zero-based position in the canonical taxonomy order.
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl PriorityCategory {
    pub fn category(&self) -> ScoreCategory {
        match self {
            PriorityCategory::AgeAppropriateness => ScoreCategory::AgeAppropriateness,
            PriorityCategory::TopicRelevance => ScoreCategory::TopicRelevance,
            PriorityCategory::DurationFit => ScoreCategory::DurationFit,
            PriorityCategory::BloomLevelMatch => ScoreCategory::BloomLevelMatch,
        }
    }
}

/// Rest or transition interval scheduled after an activity in a lesson plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Break {
    pub duration: u32,
    pub description: String,
    pub reasons: Vec<String>,
}

/// Catalog entry describing one atomic educational activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub id: Option<ActivityId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: Option<String>,
    pub age_min: u8,
    pub age_max: u8,
    pub format: ActivityFormat,
    pub bloom_level: BloomLevel,
    pub duration_min_minutes: u32,
    #[serde(default)]
    pub duration_max_minutes: Option<u32>,
    #[serde(default)]
    pub resources_needed: BTreeSet<ActivityResource>,
    #[serde(default)]
    pub topics: BTreeSet<ActivityTopic>,
    #[serde(default)]
    pub mental_load: Option<EnergyLevel>,
    #[serde(default)]
    pub physical_energy: Option<EnergyLevel>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cleanup_time_minutes: Option<u32>,
    /// Computed by the pipeline for lesson plan members; never accepted as input.
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub break_after: Option<Break>,
}

impl AsRef<Activity> for Activity {
    fn as_ref(&self) -> &Activity {
        self
    }
}

impl Activity {
    /// Display label used in logs and break reasons.
    pub fn label(&self) -> String {
        match self.id {
            Some(id) => format!("#{id} {}", self.name),
            None => self.name.clone(),
        }
    }

    /// Midpoint of the advertised duration window, using the minimum when no maximum is set.
    pub fn midpoint_minutes(&self) -> u32 {
        let min = u64::from(self.duration_min_minutes);
        let max = self.duration_max_minutes.map_or(min, u64::from);
        // The mean of two u32 values always fits back into u32.
        ((min + max) / 2) as u32
    }

    pub fn validate(&self) -> Result<(), ActivityError> {
        if self.name.trim().is_empty() {
            return Err(ActivityError::MissingName);
        }
        if self.age_min > self.age_max {
            return Err(ActivityError::InvertedAgeRange {
                activity: self.label(),
                age_min: self.age_min,
                age_max: self.age_max,
            });
        }
        if let Some(max) = self.duration_max_minutes {
            if max < self.duration_min_minutes {
                return Err(ActivityError::InvertedDurationRange {
                    activity: self.label(),
                    min: self.duration_min_minutes,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Structural problems that make an activity unusable for ranking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivityError {
    #[error("activity is missing a name")]
    MissingName,
    #[error("activity {activity}: age_min {age_min} exceeds age_max {age_max}")]
    InvertedAgeRange {
        activity: String,
        age_min: u8,
        age_max: u8,
    },
    #[error("activity {activity}: duration_max {max} is below duration_min {min}")]
    InvertedDurationRange { activity: String, min: u32, max: u32 },
}

/// Typed search criteria; every omitted field disables its filter and scorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub target_age: Option<u8>,
    #[serde(default)]
    pub formats: Option<Vec<ActivityFormat>>,
    #[serde(default)]
    pub bloom_levels: Option<Vec<BloomLevel>>,
    #[serde(default)]
    pub target_duration: Option<u32>,
    #[serde(default)]
    pub available_resources: Option<Vec<ActivityResource>>,
    #[serde(default)]
    pub preferred_topics: Option<Vec<ActivityTopic>>,
}

/// One dimension's contribution to a candidate's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: ScoreCategory,
    pub score: u8,
    pub impact: u8,
    pub priority_multiplier: f32,
    pub is_priority: bool,
}

/// Score breakdown for a single activity or a lesson plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreModel {
    pub total_score: u8,
    pub category_scores: BTreeMap<ScoreCategory, CategoryScore>,
    pub priority_categories: BTreeSet<PriorityCategory>,
    pub is_sequence: bool,
    pub activity_count: usize,
}

impl ScoreModel {
    pub fn category(&self, category: ScoreCategory) -> Option<&CategoryScore> {
        self.category_scores.get(&category)
    }
}

/// A ranked candidate: one activity or an ordered lesson plan with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub activities: Vec<Activity>,
    pub score: ScoreModel,
}

impl Recommendation {
    pub fn is_lesson_plan(&self) -> bool {
        self.activities.len() > 1
    }

    /// Midpoint durations plus every break that precedes another activity.
    pub fn total_duration_minutes(&self) -> u32 {
        total_duration_minutes(&self.activities)
    }
}

pub(crate) fn total_duration_minutes<A: AsRef<Activity>>(activities: &[A]) -> u32 {
    let last = activities.len().saturating_sub(1);
    activities
        .iter()
        .enumerate()
        .map(|(index, activity)| {
            let activity = activity.as_ref();
            let pause = match &activity.break_after {
                Some(pause) if index < last => pause.duration,
                _ => 0,
            };
            activity.midpoint_minutes().saturating_add(pause)
        })
        .fold(0u32, u32::saturating_add)
}
