// ABOUTME: Container record entity with per-activity statuses and repair codes.
// ABOUTME: Statuses are only mutated inside the crate, by workflow submissions.

mod order;
mod repair_code;
mod shared;
mod status;

pub use order::Order;
pub use repair_code::RepairCode;
pub use shared::SharedRecord;
pub use status::{BASE_ACTIVITIES, aggregate, project_activities};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::types::ContainerNumber;

/// The four inspection and remediation stages a container passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Cleaning,
    Repair,
    Periodic,
    Survey,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::Cleaning,
        ActivityKind::Repair,
        ActivityKind::Periodic,
        ActivityKind::Survey,
    ];

    /// Display name used in the activity list.
    pub fn name(&self) -> &'static str {
        match self {
            ActivityKind::Cleaning => "Cleaning",
            ActivityKind::Repair => "Repair",
            ActivityKind::Periodic => "Periodic",
            ActivityKind::Survey => "Survey",
        }
    }

    /// Whether this activity's status feeds the overall (survey) status.
    pub fn is_base(&self) -> bool {
        !matches!(self, ActivityKind::Survey)
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown activity '{0}' (expected cleaning, repair, periodic or survey)")]
pub struct UnknownActivity(pub String);

impl FromStr for ActivityKind {
    type Err = UnknownActivity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cleaning" => Ok(ActivityKind::Cleaning),
            "repair" => Ok(ActivityKind::Repair),
            "periodic" => Ok(ActivityKind::Periodic),
            "survey" => Ok(ActivityKind::Survey),
            _ => Err(UnknownActivity(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityStatus {
    #[default]
    NotFilled,
    OnReview,
    Finished,
    Rejected,
}

impl ActivityStatus {
    pub fn is_started(&self) -> bool {
        !matches!(self, ActivityStatus::NotFilled)
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityStatus::NotFilled => "Not filled",
            ActivityStatus::OnReview => "On review",
            ActivityStatus::Finished => "Finished",
            ActivityStatus::Rejected => "Rejected",
        };
        write!(f, "{label}")
    }
}

/// One change of one activity status on one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub activity: ActivityKind,
    pub from: ActivityStatus,
    pub to: ActivityStatus,
}

/// Row of the derived four-element activity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub name: &'static str,
    pub kind: ActivityKind,
    pub status: ActivityStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub is_approved: bool,
    pub approval_date: Option<NaiveDate>,
    pub approved_by: Option<String>,
}

/// Inclusive date range an activity was carried out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Per-container workflow state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerRecord {
    number: ContainerNumber,
    pub customer_code: String,
    pub commodity: Option<String>,
    cleaning_status: ActivityStatus,
    repair_status: ActivityStatus,
    periodic_status: ActivityStatus,
    survey_status: ActivityStatus,
    pub repair_codes: Vec<RepairCode>,
    pub approval: Approval,
    pub cleaning_window: Option<DateWindow>,
    pub periodic_window: Option<DateWindow>,
    pub review_remark: Option<String>,
    activities: Vec<ActivityEntry>,
}

impl ContainerRecord {
    pub fn new(number: ContainerNumber, customer_code: impl Into<String>) -> Self {
        let mut record = Self {
            number,
            customer_code: customer_code.into(),
            commodity: None,
            cleaning_status: ActivityStatus::NotFilled,
            repair_status: ActivityStatus::NotFilled,
            periodic_status: ActivityStatus::NotFilled,
            survey_status: ActivityStatus::NotFilled,
            repair_codes: Vec::new(),
            approval: Approval::default(),
            cleaning_window: None,
            periodic_window: None,
            review_remark: None,
            activities: Vec::new(),
        };
        record.activities = project_activities(&record);
        record
    }

    /// Build a record carrying statuses already known to the directory.
    pub(crate) fn with_statuses(
        number: ContainerNumber,
        customer_code: impl Into<String>,
        statuses: [ActivityStatus; 4],
    ) -> Self {
        let mut record = Self::new(number, customer_code);
        let [cleaning, repair, periodic, survey] = statuses;
        record.cleaning_status = cleaning;
        record.repair_status = repair;
        record.periodic_status = periodic;
        record.survey_status = survey;
        record.update_activities();
        record
    }

    pub fn number(&self) -> &ContainerNumber {
        &self.number
    }

    pub fn status(&self, activity: ActivityKind) -> ActivityStatus {
        match activity {
            ActivityKind::Cleaning => self.cleaning_status,
            ActivityKind::Repair => self.repair_status,
            ActivityKind::Periodic => self.periodic_status,
            ActivityKind::Survey => self.survey_status,
        }
    }

    /// The overall status derived from the three base activities.
    pub fn overall_status(&self) -> ActivityStatus {
        self.survey_status
    }

    /// Set one status, returning the change if the value differs.
    ///
    /// Does not refresh the derived view; call [`update_activities`] afterwards.
    ///
    /// [`update_activities`]: ContainerRecord::update_activities
    pub(crate) fn set_status(
        &mut self,
        activity: ActivityKind,
        status: ActivityStatus,
    ) -> Option<StatusChange> {
        let slot = match activity {
            ActivityKind::Cleaning => &mut self.cleaning_status,
            ActivityKind::Repair => &mut self.repair_status,
            ActivityKind::Periodic => &mut self.periodic_status,
            ActivityKind::Survey => &mut self.survey_status,
        };
        if *slot == status {
            return None;
        }
        let from = std::mem::replace(slot, status);
        Some(StatusChange {
            activity,
            from,
            to: status,
        })
    }

    /// Recompute the overall status and regenerate the activity list.
    ///
    /// The overall status only moves once all three base activities have
    /// left `NotFilled`. Calling this twice in a row is a no-op the second time.
    pub fn update_activities(&mut self) {
        if let Some(overall) = aggregate(
            self.cleaning_status,
            self.repair_status,
            self.periodic_status,
        ) {
            self.survey_status = overall;
        }
        self.activities = project_activities(self);
    }

    /// The derived activity list as of the last [`update_activities`] call.
    ///
    /// [`update_activities`]: ContainerRecord::update_activities
    pub fn activities(&self) -> &[ActivityEntry] {
        &self.activities
    }

    /// Statuses that differ between `self` and `other`, in activity order.
    pub fn status_changes_since(&self, other: &ContainerRecord) -> Vec<StatusChange> {
        ActivityKind::ALL
            .iter()
            .filter(|kind| self.status(**kind) != other.status(**kind))
            .map(|&activity| StatusChange {
                activity,
                from: other.status(activity),
                to: self.status(activity),
            })
            .collect()
    }
}
