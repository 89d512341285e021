// ABOUTME: Repair activity: imports repair codes and finishes the repair.
// ABOUTME: Unapproved repairs need explicit confirmation before submission.

use async_trait::async_trait;

use super::{
    ActivityData, ActivityState, ActivityStrategy, CodeCompletion, ConfirmationKind, LoadContext,
    ValidationResult,
};
use crate::diagnostics::Warning;
use crate::record::{ActivityKind, ActivityStatus, ContainerRecord};

#[derive(Debug, Clone, Copy, Default)]
pub struct RepairStrategy;

#[async_trait]
impl ActivityStrategy for RepairStrategy {
    fn kind(&self) -> ActivityKind {
        ActivityKind::Repair
    }

    async fn load_activity_data(&self, ctx: LoadContext<'_>) -> Option<ActivityData> {
        let number = ctx.record.number();
        match ctx.directory.get_container_with_repair_codes(number).await {
            Ok(Some(snapshot)) => Some(ActivityData::from_snapshot(snapshot)),
            Ok(None) => {
                tracing::debug!("no repair codes for {}", number);
                None
            }
            Err(e) => {
                ctx.diagnostics.warn(Warning::directory_unavailable(format!(
                    "repair codes for {number} unavailable: {e}"
                )));
                None
            }
        }
    }

    fn apply_activity_data(
        &self,
        record: &mut ContainerRecord,
        state: &mut ActivityState,
        mut data: ActivityData,
    ) {
        record.repair_codes = data.take_codes_reset();
        record.approval = data.approval();
        state.approval = data.approval();
        state.description = data.description;
    }

    fn validate_submission(
        &self,
        _record: &ContainerRecord,
        state: &ActivityState,
    ) -> ValidationResult {
        if !state.has_photos() {
            return ValidationResult::invalid("Please upload at least one photo of the repair");
        }

        if !state.approval.is_approved && !state.is_confirmed(ConfirmationKind::NotApproved) {
            return ValidationResult::confirm(
                ConfirmationKind::NotApproved,
                "This repair has not been approved yet. Continue anyway?",
            );
        }

        ValidationResult::Valid
    }

    fn submit(&self, record: &mut ContainerRecord, _state: &ActivityState) -> bool {
        record.set_status(ActivityKind::Repair, ActivityStatus::Finished);
        record.update_activities();
        true
    }

    fn toggle_code(
        &self,
        record: &mut ContainerRecord,
        _state: &mut ActivityState,
        index: usize,
        completion: CodeCompletion,
    ) -> bool {
        match record.repair_codes.get_mut(index) {
            Some(code) => {
                completion.apply(code);
                true
            }
            None => false,
        }
    }
}
