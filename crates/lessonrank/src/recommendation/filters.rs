use super::domain::{Activity, SearchCriteria};

/// Years either side of the target age an activity's range may miss by and still pass.
pub const AGE_FILTER_TOLERANCE: i32 = 2;

/// Keeps the activities that pass every hard filter whose criterion is present.
/// Order-preserving; an omitted or empty criterion skips its filter.
pub fn apply_hard_filters<'a, I>(activities: I, criteria: &SearchCriteria) -> Vec<&'a Activity>
where
    I: IntoIterator<Item = &'a Activity>,
{
    activities
        .into_iter()
        .filter(|activity| passes(activity, criteria))
        .collect()
}

pub fn passes(activity: &Activity, criteria: &SearchCriteria) -> bool {
    passes_age(activity, criteria)
        && passes_format(activity, criteria)
        && passes_duration(activity, criteria)
        && passes_resources(activity, criteria)
        && passes_bloom_level(activity, criteria)
        && passes_topics(activity, criteria)
}

fn passes_age(activity: &Activity, criteria: &SearchCriteria) -> bool {
    match criteria.target_age {
        Some(target) => {
            let target = i32::from(target);
            i32::from(activity.age_min) <= target + AGE_FILTER_TOLERANCE
                && i32::from(activity.age_max) >= target - AGE_FILTER_TOLERANCE
        }
        None => true,
    }
}

fn passes_format(activity: &Activity, criteria: &SearchCriteria) -> bool {
    match criteria.formats.as_deref() {
        Some(formats) if !formats.is_empty() => formats.contains(&activity.format),
        _ => true,
    }
}

/// Excludes activities whose minimum duration already exceeds the target.
fn passes_duration(activity: &Activity, criteria: &SearchCriteria) -> bool {
    criteria
        .target_duration
        .map_or(true, |target| activity.duration_min_minutes <= target)
}

fn passes_resources(activity: &Activity, criteria: &SearchCriteria) -> bool {
    match criteria.available_resources.as_deref() {
        Some(available) if !available.is_empty() => activity
            .resources_needed
            .iter()
            .all(|required| available.contains(required)),
        _ => true,
    }
}

fn passes_bloom_level(activity: &Activity, criteria: &SearchCriteria) -> bool {
    match criteria.bloom_levels.as_deref() {
        Some(levels) if !levels.is_empty() => levels.contains(&activity.bloom_level),
        _ => true,
    }
}

/// Any overlap with the preferred topics is enough.
fn passes_topics(activity: &Activity, criteria: &SearchCriteria) -> bool {
    match criteria.preferred_topics.as_deref() {
        Some(topics) if !topics.is_empty() => {
            topics.iter().any(|topic| activity.topics.contains(topic))
        }
        _ => true,
    }
}
