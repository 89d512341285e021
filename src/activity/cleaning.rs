// ABOUTME: Cleaning activity: five segment photos, a date window, and requirements.
// ABOUTME: Submission puts cleaning on review until a survey decides it.

use async_trait::async_trait;

use super::data::{EXTRA_CLEANING_REQUIREMENT, EXTRA_COMMODITY};
use super::{
    ActivityData, ActivityState, ActivityStrategy, CodeCompletion, ConfirmationKind, LoadContext,
    ValidationResult,
};
use crate::diagnostics::Warning;
use crate::record::{ActivityKind, ActivityStatus, ContainerRecord, DateWindow};

#[derive(Debug, Clone, Copy, Default)]
pub struct CleaningStrategy;

#[async_trait]
impl ActivityStrategy for CleaningStrategy {
    fn kind(&self) -> ActivityKind {
        ActivityKind::Cleaning
    }

    async fn load_activity_data(&self, ctx: LoadContext<'_>) -> Option<ActivityData> {
        let number = ctx.record.number();
        match ctx.directory.get_container_cleaning_details(number).await {
            Ok(Some(snapshot)) => Some(ActivityData::from_snapshot(snapshot)),
            Ok(None) => {
                tracing::debug!("no cleaning details for {}", number);
                None
            }
            Err(e) => {
                ctx.diagnostics.warn(Warning::directory_unavailable(format!(
                    "cleaning details for {number} unavailable: {e}"
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
        if let Some(commodity) = data.extra(EXTRA_COMMODITY) {
            record.commodity = Some(commodity.to_string());
        }
        state.cleaning_requirement_text = data.extra(EXTRA_CLEANING_REQUIREMENT).map(str::to_string);
        state.cleaning_requirements = data.take_codes_reset();
        state.approval = data.approval();
        state.description = data.description;
    }

    fn validate_submission(
        &self,
        _record: &ContainerRecord,
        state: &ActivityState,
    ) -> ValidationResult {
        let missing = state.missing_segments();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|s| s.name()).collect();
            return ValidationResult::invalid(format!(
                "Please upload photos for: {}",
                names.join(", ")
            ));
        }

        if state.end_date < state.start_date {
            return ValidationResult::invalid("End date cannot be before start date");
        }

        let incomplete = state.incomplete_requirements();
        if incomplete > 0 && !state.is_confirmed(ConfirmationKind::IncompleteCleaningRequirements) {
            return ValidationResult::confirm(
                ConfirmationKind::IncompleteCleaningRequirements,
                format!(
                    "{incomplete} of {} cleaning requirements are not completed. Continue anyway?",
                    state.cleaning_requirements.len()
                ),
            );
        }

        ValidationResult::Valid
    }

    fn submit(&self, record: &mut ContainerRecord, state: &ActivityState) -> bool {
        record.set_status(ActivityKind::Cleaning, ActivityStatus::OnReview);
        record.cleaning_window = Some(DateWindow {
            start: state.start_date,
            end: state.end_date,
        });
        record.update_activities();
        true
    }

    fn toggle_code(
        &self,
        _record: &mut ContainerRecord,
        state: &mut ActivityState,
        index: usize,
        completion: CodeCompletion,
    ) -> bool {
        match state.cleaning_requirements.get_mut(index) {
            Some(code) => {
                completion.apply(code);
                true
            }
            None => false,
        }
    }
}
