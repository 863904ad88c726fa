use std::collections::BTreeSet;
use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::recommendation::domain::{
    Activity, ActivityError, ActivityId, ActivityResource, UnknownTag,
};

/// Why a single catalog row was rejected.
#[derive(Debug, thiserror::Error)]
pub(crate) enum RowError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Tag(#[from] UnknownTag),
    #[error(transparent)]
    Invalid(#[from] ActivityError),
    #[error("column `{column}` expects a non-negative integer (got `{value}`)")]
    Number { column: &'static str, value: String },
}

/// Parses catalog rows, skipping (and logging) any row that cannot become an activity.
pub(crate) fn parse_activities<R: Read>(reader: R) -> Result<Vec<Activity>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    // Force the header row to be read so a malformed header fails the whole import.
    csv_reader.headers()?;

    let mut activities = Vec::new();
    for (index, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        match row.map_err(RowError::from).and_then(CatalogRow::into_activity) {
            Ok(activity) => activities.push(activity),
            Err(err) => warn!(line, error = %err, "skipping catalog row"),
        }
    }

    Ok(activities)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    source: Option<String>,
    age_min: u8,
    age_max: u8,
    format: String,
    #[serde(default)]
    resources_needed: String,
    bloom_level: String,
    duration_min_minutes: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    duration_max_minutes: Option<String>,
    #[serde(default)]
    topics: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    mental_load: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    physical_energy: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    prep_time_minutes: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cleanup_time_minutes: Option<String>,
}

impl CatalogRow {
    fn into_activity(self) -> Result<Activity, RowError> {
        let activity = Activity {
            id: parse_number(self.id.as_deref(), "id")?.map(ActivityId),
            name: self.name,
            description: self.description,
            source: self.source,
            age_min: self.age_min,
            age_max: self.age_max,
            format: self.format.parse()?,
            bloom_level: self.bloom_level.parse()?,
            duration_min_minutes: self.duration_min_minutes,
            duration_max_minutes: parse_number(
                self.duration_max_minutes.as_deref(),
                "duration_max_minutes",
            )?,
            resources_needed: parse_resources(&self.resources_needed),
            topics: split_list(&self.topics)
                .map(str::parse)
                .collect::<Result<BTreeSet<_>, _>>()?,
            mental_load: self.mental_load.as_deref().map(str::parse).transpose()?,
            physical_energy: self.physical_energy.as_deref().map(str::parse).transpose()?,
            prep_time_minutes: parse_number(self.prep_time_minutes.as_deref(), "prep_time_minutes")?,
            cleanup_time_minutes: parse_number(
                self.cleanup_time_minutes.as_deref(),
                "cleanup_time_minutes",
            )?,
            break_after: None,
        };

        activity.validate()?;
        Ok(activity)
    }
}

/// Pipe-separated list cells, e.g. `patterns|algorithms`.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split('|').map(str::trim).filter(|item| !item.is_empty())
}

/// Unknown resources are dropped with a warning rather than rejecting the row.
fn parse_resources(raw: &str) -> BTreeSet<ActivityResource> {
    split_list(raw)
        .filter_map(|item| match item.parse() {
            Ok(resource) => Some(resource),
            Err(err) => {
                warn!(error = %err, "ignoring invalid resource");
                None
            }
        })
        .collect()
}

fn parse_number<T: FromStr>(
    raw: Option<&str>,
    column: &'static str,
) -> Result<Option<T>, RowError> {
    raw.map(|value| {
        value.parse::<T>().map_err(|_| RowError::Number {
            column,
            value: value.to_string(),
        })
    })
    .transpose()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
