// ABOUTME: Activity strategies: per-activity loading, validation, and submission.
// ABOUTME: The engine picks one strategy per session and drives it in a fixed order.

mod cleaning;
mod data;
mod periodic;
mod repair;
mod state;
mod survey;

pub use cleaning::CleaningStrategy;
pub use data::{
    ActivityData, Confirmation, ConfirmationKind, EXTRA_CLEANING_REQUIREMENT, EXTRA_COMMODITY,
    EXTRA_END_DATE, EXTRA_REVIEW_TARGET, EXTRA_START_DATE, ValidationResult,
};
pub use periodic::{DEFAULT_INTERVAL_MONTHS, PeriodicStrategy};
pub use repair::RepairStrategy;
pub use state::{ActivityState, CleaningSegment, Photo, PhotoSlot, ReviewDecision};
pub use survey::{SURVEY_REVIEW_TARGET, SurveyStrategy};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::diagnostics::Diagnostics;
use crate::directory::ContainerDirectory;
use crate::record::{ActivityKind, ContainerRecord};

/// Inputs available while loading activity data.
pub struct LoadContext<'a> {
    /// Snapshot of the record taken when loading started.
    pub record: &'a ContainerRecord,
    pub directory: &'a dyn ContainerDirectory,
    pub today: NaiveDate,
    pub diagnostics: &'a mut Diagnostics,
}

/// Behaviour of one activity type.
///
/// The engine calls `load_activity_data`, then `apply_activity_data`, then
/// (after user edits) `validate_submission`, and finally `submit`.
#[async_trait]
pub trait ActivityStrategy: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> ActivityKind;

    /// Fetch or compute context for the session. `None` means there is
    /// nothing to load, which is not an error. Directory failures are logged
    /// and recorded as warnings, then reported as `None`.
    async fn load_activity_data(&self, ctx: LoadContext<'_>) -> Option<ActivityData>;

    /// Copy loaded data onto the record and the session state.
    fn apply_activity_data(
        &self,
        record: &mut ContainerRecord,
        state: &mut ActivityState,
        data: ActivityData,
    );

    /// Check the session against the activity's rules. Never fails.
    fn validate_submission(&self, record: &ContainerRecord, state: &ActivityState)
    -> ValidationResult;

    /// Set the activity's status and refresh the derived activity list.
    /// Returns false if nothing was committed.
    fn submit(&self, record: &mut ContainerRecord, state: &ActivityState) -> bool;

    /// Toggle completion of an imported code. Activities without codes
    /// report false.
    fn toggle_code(
        &self,
        _record: &mut ContainerRecord,
        _state: &mut ActivityState,
        _index: usize,
        _completion: CodeCompletion,
    ) -> bool {
        false
    }
}

/// Completion change requested for a repair or cleaning code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeCompletion {
    Completed {
        actor: Option<String>,
        notes: Option<String>,
    },
    Incomplete,
}

impl CodeCompletion {
    pub fn completed() -> Self {
        CodeCompletion::Completed {
            actor: None,
            notes: None,
        }
    }

    fn apply(self, code: &mut crate::record::RepairCode) {
        match self {
            CodeCompletion::Completed { actor, notes } => code.mark_completed(actor, notes),
            CodeCompletion::Incomplete => code.mark_incomplete(),
        }
    }
}

/// Tunables for strategy construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySettings {
    /// Months from a periodic inspection to the next one due.
    pub periodic_interval_months: u32,
}

impl Default for ActivitySettings {
    fn default() -> Self {
        Self {
            periodic_interval_months: DEFAULT_INTERVAL_MONTHS,
        }
    }
}

/// Select the strategy implementing `kind`.
pub fn strategy_for(kind: ActivityKind, settings: &ActivitySettings) -> Box<dyn ActivityStrategy> {
    match kind {
        ActivityKind::Cleaning => Box::new(CleaningStrategy),
        ActivityKind::Repair => Box::new(RepairStrategy),
        ActivityKind::Periodic => Box::new(PeriodicStrategy::new(settings.periodic_interval_months)),
        ActivityKind::Survey => Box::new(SurveyStrategy),
    }
}
