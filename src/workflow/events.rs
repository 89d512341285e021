// ABOUTME: Status-change notifications broadcast after a submission commits.
// ABOUTME: One event per activity status that actually changed.

use serde::Serialize;

use crate::record::{ActivityKind, ActivityStatus, StatusChange};
use crate::types::ContainerNumber;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChanged {
    pub container: ContainerNumber,
    pub activity: ActivityKind,
    pub from: ActivityStatus,
    pub to: ActivityStatus,
}

impl StatusChanged {
    pub fn new(container: ContainerNumber, change: StatusChange) -> Self {
        Self {
            container,
            activity: change.activity,
            from: change.from,
            to: change.to,
        }
    }

    /// Whether this event moved the overall (survey) status.
    pub fn is_overall(&self) -> bool {
        !self.activity.is_base()
    }
}
