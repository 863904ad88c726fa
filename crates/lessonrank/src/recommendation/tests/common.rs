use std::collections::BTreeSet;
use std::sync::Arc;

use crate::catalog::ActivityCatalog;
use crate::recommendation::domain::{
    Activity, ActivityFormat, ActivityId, ActivityResource, ActivityTopic, BloomLevel,
    EnergyLevel, SearchCriteria,
};

pub(crate) struct ActivityBuilder {
    activity: Activity,
}

/// Baseline activity that passes [`criteria`]: ages 10-14, unplugged, understand, 30 minutes,
/// algorithms, handouts.
pub(crate) fn activity(id: u32) -> ActivityBuilder {
    ActivityBuilder {
        activity: Activity {
            id: Some(ActivityId(id)),
            name: format!("Activity {id}"),
            description: format!("Test activity number {id}"),
            source: None,
            age_min: 10,
            age_max: 14,
            format: ActivityFormat::Unplugged,
            bloom_level: BloomLevel::Understand,
            duration_min_minutes: 30,
            duration_max_minutes: None,
            resources_needed: BTreeSet::from([ActivityResource::Handouts]),
            topics: BTreeSet::from([ActivityTopic::Algorithms]),
            mental_load: None,
            physical_energy: None,
            prep_time_minutes: None,
            cleanup_time_minutes: None,
            break_after: None,
        },
    }
}

impl ActivityBuilder {
    pub(crate) fn ages(mut self, min: u8, max: u8) -> Self {
        self.activity.age_min = min;
        self.activity.age_max = max;
        self
    }

    pub(crate) fn format(mut self, format: ActivityFormat) -> Self {
        self.activity.format = format;
        self
    }

    pub(crate) fn bloom(mut self, level: BloomLevel) -> Self {
        self.activity.bloom_level = level;
        self
    }

    pub(crate) fn duration(mut self, min: u32, max: Option<u32>) -> Self {
        self.activity.duration_min_minutes = min;
        self.activity.duration_max_minutes = max;
        self
    }

    pub(crate) fn topics(mut self, topics: &[ActivityTopic]) -> Self {
        self.activity.topics = topics.iter().copied().collect();
        self
    }

    pub(crate) fn resources(mut self, resources: &[ActivityResource]) -> Self {
        self.activity.resources_needed = resources.iter().copied().collect();
        self
    }

    pub(crate) fn mental_load(mut self, level: EnergyLevel) -> Self {
        self.activity.mental_load = Some(level);
        self
    }

    pub(crate) fn physical_energy(mut self, level: EnergyLevel) -> Self {
        self.activity.physical_energy = Some(level);
        self
    }

    pub(crate) fn cleanup(mut self, minutes: u32) -> Self {
        self.activity.cleanup_time_minutes = Some(minutes);
        self
    }

    pub(crate) fn build(self) -> Activity {
        self.activity
    }
}

pub(crate) fn criteria() -> SearchCriteria {
    SearchCriteria {
        target_age: Some(12),
        formats: Some(vec![ActivityFormat::Unplugged]),
        bloom_levels: Some(vec![BloomLevel::Understand, BloomLevel::Apply]),
        target_duration: Some(30),
        available_resources: Some(vec![ActivityResource::Handouts]),
        preferred_topics: Some(vec![ActivityTopic::Algorithms, ActivityTopic::Patterns]),
    }
}

pub(crate) fn catalog(activities: Vec<Activity>) -> Arc<ActivityCatalog> {
    Arc::new(ActivityCatalog::new(activities))
}
