use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{PriorityCategory, SearchCriteria, UnknownTag};
use super::pipeline::{RecommendationOptions, DEFAULT_MAX_ACTIVITY_COUNT, DEFAULT_RECOMMENDATION_LIMIT};

const TARGET_AGE_RANGE: RangeInclusive<i64> = 6..=15;
const TARGET_DURATION_RANGE: RangeInclusive<i64> = 1..=480;
const LIMIT_RANGE: RangeInclusive<i64> = 1..=50;
const MAX_ACTIVITY_COUNT_RANGE: RangeInclusive<i64> = 1..=10;

/// Untyped search as received from a caller; tags are validated by [`into_parts`].
///
/// [`into_parts`]: RecommendationRequest::into_parts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub target_age: Option<i64>,
    #[serde(default)]
    pub format: Option<Vec<String>>,
    #[serde(default)]
    pub bloom_levels: Option<Vec<String>>,
    #[serde(default)]
    pub target_duration: Option<i64>,
    #[serde(default)]
    pub available_resources: Option<Vec<String>>,
    #[serde(default)]
    pub preferred_topics: Option<Vec<String>>,
    #[serde(default)]
    pub priority_categories: Option<Vec<String>>,
    #[serde(default)]
    pub include_breaks: bool,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub max_activity_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    UnknownTag(#[from] UnknownTag),
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl RecommendationRequest {
    pub fn into_parts(
        self,
    ) -> Result<(SearchCriteria, BTreeSet<PriorityCategory>, RecommendationOptions), RequestError>
    {
        let criteria = SearchCriteria {
            target_age: bounded("target_age", self.target_age, TARGET_AGE_RANGE)?
                .map(|age| age as u8),
            formats: parse_tags(self.format)?,
            bloom_levels: parse_tags(self.bloom_levels)?,
            target_duration: bounded("target_duration", self.target_duration, TARGET_DURATION_RANGE)?
                .map(|minutes| minutes as u32),
            available_resources: parse_tags(self.available_resources)?,
            preferred_topics: parse_tags(self.preferred_topics)?,
        };

        let priorities = self
            .priority_categories
            .unwrap_or_default()
            .iter()
            .filter_map(|raw| match raw.parse::<PriorityCategory>() {
                Ok(category) => Some(category),
                Err(err) => {
                    warn!(error = %err, "ignoring unknown priority category");
                    None
                }
            })
            .collect();

        let options = RecommendationOptions {
            include_breaks: self.include_breaks,
            max_activity_count: bounded(
                "max_activity_count",
                self.max_activity_count,
                MAX_ACTIVITY_COUNT_RANGE,
            )?
            .map_or(DEFAULT_MAX_ACTIVITY_COUNT, |count| count as usize),
            limit: bounded("limit", self.limit, LIMIT_RANGE)?
                .map_or(DEFAULT_RECOMMENDATION_LIMIT, |limit| limit as usize),
        };

        Ok((criteria, priorities, options))
    }
}

fn bounded(
    field: &'static str,
    value: Option<i64>,
    range: RangeInclusive<i64>,
) -> Result<Option<i64>, RequestError> {
    match value {
        Some(value) if !range.contains(&value) => Err(RequestError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        }),
        other => Ok(other),
    }
}

/// Parses a tag list, deduplicating while keeping first-seen order. Empty lists become `None`.
fn parse_tags<T>(raw: Option<Vec<String>>) -> Result<Option<Vec<T>>, RequestError>
where
    T: FromStr<Err = UnknownTag> + PartialEq,
{
    let mut parsed = Vec::new();
    for value in raw.unwrap_or_default() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let tag = value.parse::<T>()?;
        if !parsed.contains(&tag) {
            parsed.push(tag);
        }
    }

    Ok(if parsed.is_empty() { None } else { Some(parsed) })
}
