// ABOUTME: Survey activity: accept or reject the activity currently on review.
// ABOUTME: The reviewed status moves to Finished or Rejected; the overall status follows.

use async_trait::async_trait;

use super::data::EXTRA_REVIEW_TARGET;
use super::{ActivityData, ActivityState, ActivityStrategy, LoadContext, ValidationResult};
use crate::record::{ActivityKind, ActivityStatus, ContainerRecord};

/// The activity a survey accepts or rejects.
///
/// Only cleaning goes through review today, even though a survey conceptually
/// covers all three base activities. Widening this needs a product decision.
pub const SURVEY_REVIEW_TARGET: ActivityKind = ActivityKind::Cleaning;

#[derive(Debug, Clone, Copy, Default)]
pub struct SurveyStrategy;

impl SurveyStrategy {
    /// Whether `record` has something for a survey to decide.
    pub fn can_review(record: &ContainerRecord) -> bool {
        record.status(SURVEY_REVIEW_TARGET) == ActivityStatus::OnReview
    }
}

#[async_trait]
impl ActivityStrategy for SurveyStrategy {
    fn kind(&self) -> ActivityKind {
        ActivityKind::Survey
    }

    async fn load_activity_data(&self, ctx: LoadContext<'_>) -> Option<ActivityData> {
        Some(
            ActivityData::from_approval(&ctx.record.approval, "Survey review")
                .with_extra(EXTRA_REVIEW_TARGET, SURVEY_REVIEW_TARGET.name()),
        )
    }

    fn apply_activity_data(
        &self,
        record: &mut ContainerRecord,
        state: &mut ActivityState,
        data: ActivityData,
    ) {
        state.approval = data.approval();
        state.description = data.description;
        state.previous_remark = record.review_remark.clone();
    }

    fn validate_submission(
        &self,
        record: &ContainerRecord,
        state: &ActivityState,
    ) -> ValidationResult {
        if !Self::can_review(record) {
            return ValidationResult::invalid(format!(
                "{} is not on review (current status: {})",
                SURVEY_REVIEW_TARGET,
                record.status(SURVEY_REVIEW_TARGET)
            ));
        }

        if !state.has_photos() {
            return ValidationResult::invalid("Please upload at least one survey photo");
        }

        if !state.review().is_decided() {
            return ValidationResult::invalid(format!(
                "Please accept or reject the {}",
                SURVEY_REVIEW_TARGET.name().to_lowercase()
            ));
        }

        ValidationResult::Valid
    }

    fn submit(&self, record: &mut ContainerRecord, state: &ActivityState) -> bool {
        let review = state.review();
        let outcome = if review.accept() {
            record.review_remark = None;
            ActivityStatus::Finished
        } else {
            record.review_remark = review.remark().map(str::to_string);
            ActivityStatus::Rejected
        };
        record.set_status(SURVEY_REVIEW_TARGET, outcome);
        record.update_activities();
        true
    }
}
