// ABOUTME: Overall status aggregation over the three base activities.
// ABOUTME: Also projects a record into the four-element activity list.

use super::{ActivityEntry, ActivityKind, ActivityStatus, ContainerRecord};

/// Activities whose statuses drive the overall status, in display order.
pub const BASE_ACTIVITIES: [ActivityKind; 3] = [
    ActivityKind::Cleaning,
    ActivityKind::Repair,
    ActivityKind::Periodic,
];

/// Derive the overall status from the three base statuses.
///
/// Returns `None` while any of them is still `NotFilled`: the overall status
/// is left as it was rather than downgraded. Otherwise the result is
/// `Finished` when all three are `Finished`, and `OnReview` in every other case.
pub fn aggregate(
    cleaning: ActivityStatus,
    repair: ActivityStatus,
    periodic: ActivityStatus,
) -> Option<ActivityStatus> {
    let statuses = [cleaning, repair, periodic];

    if !statuses.iter().all(ActivityStatus::is_started) {
        return None;
    }

    if statuses.iter().all(|s| *s == ActivityStatus::Finished) {
        Some(ActivityStatus::Finished)
    } else {
        Some(ActivityStatus::OnReview)
    }
}

/// Project the live statuses of a record into display rows.
pub fn project_activities(record: &ContainerRecord) -> Vec<ActivityEntry> {
    ActivityKind::ALL
        .iter()
        .map(|&kind| ActivityEntry {
            name: kind.name(),
            kind,
            status: record.status(kind),
        })
        .collect()
}
