use serde::Serialize;

use super::super::domain::ScoreCategory;

/// Multiplier reported on category scores the caller flagged as priorities.
pub const PRIORITY_CATEGORY_MULTIPLIER: f32 = 2.0;

/// Static description of a scoring dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryDefinition {
    pub category: ScoreCategory,
    pub impact: u8,
    pub description: &'static str,
}

pub static SCORING_CATEGORIES: [CategoryDefinition; 5] = [
    CategoryDefinition {
        category: ScoreCategory::AgeAppropriateness,
        impact: 4,
        description: "How well the activity matches the target age range",
    },
    CategoryDefinition {
        category: ScoreCategory::BloomLevelMatch,
        impact: 5,
        description: "How well the activity matches the target Bloom's taxonomy level",
    },
    CategoryDefinition {
        category: ScoreCategory::TopicRelevance,
        impact: 4,
        description: "How well the activity covers the preferred computational thinking topics",
    },
    CategoryDefinition {
        category: ScoreCategory::DurationFit,
        impact: 3,
        description: "How well the total duration (activities + breaks) matches the target duration",
    },
    CategoryDefinition {
        category: ScoreCategory::SeriesCohesion,
        impact: 3,
        description: "How well activities in a series work together (topic overlap + Bloom progression)",
    },
];

impl ScoreCategory {
    pub fn definition(&self) -> &'static CategoryDefinition {
        match self {
            ScoreCategory::AgeAppropriateness => &SCORING_CATEGORIES[0],
            ScoreCategory::BloomLevelMatch => &SCORING_CATEGORIES[1],
            ScoreCategory::TopicRelevance => &SCORING_CATEGORIES[2],
            ScoreCategory::DurationFit => &SCORING_CATEGORIES[3],
            ScoreCategory::SeriesCohesion => &SCORING_CATEGORIES[4],
        }
    }

    pub fn impact(&self) -> u8 {
        self.definition().impact
    }
}
