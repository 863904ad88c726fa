use std::borrow::Cow;

use super::domain::{Activity, Break, EnergyLevel};

/// Break durations are rounded up to this increment.
pub const BREAK_DURATION_INCREMENT: u32 = 5;
const MENTAL_REST_MINUTES: u32 = 10;
const PHYSICAL_REST_MINUTES: u32 = 5;
const TRANSITION_MINUTES: u32 = 5;

pub fn round_up_to_increment(minutes: u32) -> u32 {
    minutes
        .div_ceil(BREAK_DURATION_INCREMENT)
        .saturating_mul(BREAK_DURATION_INCREMENT)
}

/// Heuristic pause needed between `current` and the activity that follows it.
pub fn break_between(current: &Activity, next: &Activity) -> Option<Break> {
    let mut duration: u32 = 0;
    let mut reasons = Vec::new();

    if let Some(cleanup) = current.cleanup_time_minutes.filter(|minutes| *minutes > 0) {
        duration = duration.saturating_add(cleanup);
        reasons.push(format!("Cleanup time for {}", current.name));
    }

    if current.mental_load == Some(EnergyLevel::High) {
        duration = duration.saturating_add(MENTAL_REST_MINUTES);
        reasons.push("Mental rest break after high cognitive load".to_string());
    }

    if current.physical_energy == Some(EnergyLevel::High) {
        duration = duration.saturating_add(PHYSICAL_REST_MINUTES);
        reasons.push("Physical rest break after high energy activity".to_string());
    }

    if current.format != next.format {
        duration = duration.saturating_add(TRANSITION_MINUTES);
        reasons.push(format!(
            "Transition break from {} to {}",
            current.format, next.format
        ));
    }

    if reasons.is_empty() || duration == 0 {
        return None;
    }

    Some(Break {
        duration: round_up_to_increment(duration),
        description: reasons.join("; "),
        reasons,
    })
}

/// Attaches `break_after` to every non-final member of a lesson plan.
///
/// Only positions that are followed by another activity are visited, so the final member never
/// carries a break and nothing precedes the first one. Members are cloned only when a break is
/// attached; stale breaks on the final member are cleared.
pub fn assign_breaks(activities: &mut [Cow<'_, Activity>]) {
    if activities.len() < 2 {
        return;
    }

    for index in 0..activities.len() - 1 {
        let pause = break_between(&activities[index], &activities[index + 1]);
        if pause.is_some() || activities[index].break_after.is_some() {
            activities[index].to_mut().break_after = pause;
        }
    }

    if let Some(last) = activities.last_mut() {
        if last.break_after.is_some() {
            last.to_mut().break_after = None;
        }
    }
}
