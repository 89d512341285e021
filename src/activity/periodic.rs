// ABOUTME: Periodic inspection activity with a locally computed date window.
// ABOUTME: The window runs from today to the next inspection due date.

use async_trait::async_trait;
use chrono::{Months, NaiveDate};

use super::data::{EXTRA_END_DATE, EXTRA_START_DATE};
use super::{
    ActivityData, ActivityState, ActivityStrategy, ConfirmationKind, LoadContext, ValidationResult,
};
use crate::record::{ActivityKind, ActivityStatus, ContainerRecord, DateWindow};

/// Two years and six months between periodic inspections.
pub const DEFAULT_INTERVAL_MONTHS: u32 = 30;

#[derive(Debug, Clone, Copy)]
pub struct PeriodicStrategy {
    interval_months: u32,
}

impl PeriodicStrategy {
    pub fn new(interval_months: u32) -> Self {
        Self { interval_months }
    }

    /// Next inspection due date for an inspection carried out on `from`.
    /// Month-end dates clamp to the last day of the target month.
    pub fn next_due(&self, from: NaiveDate) -> NaiveDate {
        from.checked_add_months(Months::new(self.interval_months))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl Default for PeriodicStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_MONTHS)
    }
}

#[async_trait]
impl ActivityStrategy for PeriodicStrategy {
    fn kind(&self) -> ActivityKind {
        ActivityKind::Periodic
    }

    async fn load_activity_data(&self, ctx: LoadContext<'_>) -> Option<ActivityData> {
        let due = self.next_due(ctx.today);
        Some(
            ActivityData::from_approval(&ctx.record.approval, "Periodic inspection")
                .with_extra(EXTRA_START_DATE, ctx.today.to_string())
                .with_extra(EXTRA_END_DATE, due.to_string()),
        )
    }

    fn apply_activity_data(
        &self,
        _record: &mut ContainerRecord,
        state: &mut ActivityState,
        data: ActivityData,
    ) {
        if let Some(start) = data.extra_date(EXTRA_START_DATE) {
            state.start_date = start;
        }
        state.end_date = data
            .extra_date(EXTRA_END_DATE)
            .unwrap_or_else(|| self.next_due(state.start_date));
        state.approval = data.approval();
        state.description = data.description;
    }

    fn validate_submission(
        &self,
        _record: &ContainerRecord,
        state: &ActivityState,
    ) -> ValidationResult {
        if !state.has_photos() {
            return ValidationResult::invalid(
                "Please upload a photo of the identification plate",
            );
        }

        if !state.approval.is_approved && !state.is_confirmed(ConfirmationKind::NotApproved) {
            return ValidationResult::confirm(
                ConfirmationKind::NotApproved,
                "This periodic inspection has not been approved yet. Continue anyway?",
            );
        }

        ValidationResult::Valid
    }

    fn submit(&self, record: &mut ContainerRecord, state: &ActivityState) -> bool {
        record.set_status(ActivityKind::Periodic, ActivityStatus::Finished);
        record.periodic_window = Some(DateWindow {
            start: state.start_date,
            end: state.end_date,
        });
        record.update_activities();
        true
    }
}
