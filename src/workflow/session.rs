// ABOUTME: Activity session parameterized by its workflow state.
// ABOUTME: Transitions consume the session; failures hand back an editable one.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::engine::EngineShared;
use super::error::SubmitError;
use super::events::StatusChanged;
use crate::activity::{
    ActivityState, ActivityStrategy, CodeCompletion, ConfirmationKind, ValidationResult,
};
use crate::diagnostics::Diagnostics;
use crate::record::{ActivityKind, ContainerRecord, SharedRecord};

// =============================================================================
// State markers
// =============================================================================

/// Data loaded (or found absent); the user is editing.
/// Available actions: `validate()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Loaded;

/// Validation passed against the live record.
/// Available actions: `submit()`, `revise()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Accepted;

/// Submission committed. Terminal; open a new session for further work.
#[derive(Debug, Clone, Default)]
pub struct Completed {
    changes: Vec<StatusChanged>,
}

/// Result of a validation attempt.
pub type ValidateResult =
    Result<WorkflowSession<Accepted>, (WorkflowSession<Loaded>, ValidationResult)>;

/// Result of a submission attempt.
pub type SubmitResult = Result<WorkflowSession<Completed>, (WorkflowSession<Loaded>, SubmitError)>;

// =============================================================================
// Session
// =============================================================================

/// One user working on one activity of one container.
pub struct WorkflowSession<S> {
    engine: Arc<EngineShared>,
    strategy: Box<dyn ActivityStrategy>,
    record: SharedRecord,
    state: ActivityState,
    diagnostics: Diagnostics,
    token: CancellationToken,
    stage: S,
}

impl<S: std::fmt::Debug> std::fmt::Debug for WorkflowSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowSession")
            .field("container", self.record.number())
            .field("activity", &self.strategy.kind())
            .field("stage", &self.stage)
            .finish()
    }
}

impl<S> WorkflowSession<S> {
    fn transition<T>(self, stage: T) -> WorkflowSession<T> {
        WorkflowSession {
            engine: self.engine,
            strategy: self.strategy,
            record: self.record,
            state: self.state,
            diagnostics: self.diagnostics,
            token: self.token,
            stage,
        }
    }

    pub fn activity(&self) -> ActivityKind {
        self.strategy.kind()
    }

    pub fn record(&self) -> &SharedRecord {
        &self.record
    }

    /// Current contents of the live record.
    pub fn snapshot(&self) -> ContainerRecord {
        self.record.snapshot()
    }

    pub fn state(&self) -> &ActivityState {
        &self.state
    }

    /// Whether loading produced data; false means defaults are in use.
    pub fn has_data(&self) -> bool {
        self.state.has_data
    }

    /// Warnings collected while this session loaded.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

// =============================================================================
// Loaded
// =============================================================================

impl WorkflowSession<Loaded> {
    pub(super) fn loaded(
        engine: Arc<EngineShared>,
        strategy: Box<dyn ActivityStrategy>,
        record: SharedRecord,
        state: ActivityState,
        diagnostics: Diagnostics,
        token: CancellationToken,
    ) -> Self {
        Self {
            engine,
            strategy,
            record,
            state,
            diagnostics,
            token,
            stage: Loaded,
        }
    }

    pub fn state_mut(&mut self) -> &mut ActivityState {
        &mut self.state
    }

    /// Accept a confirmation gate raised by a previous validation.
    pub fn confirm(&mut self, kind: ConfirmationKind) {
        self.state.confirm(kind);
    }

    /// Toggle completion of the code at `index`. Returns false when the
    /// activity has no codes or the index is out of range.
    pub fn toggle_code(&mut self, index: usize, completion: CodeCompletion) -> bool {
        let strategy = &self.strategy;
        let state = &mut self.state;
        self.record
            .update(|live| strategy.toggle_code(live, state, index, completion))
    }

    /// Check the session against the live record.
    #[must_use = "validation consumes the session; use the returned session"]
    pub fn validate(self) -> ValidateResult {
        let result = self
            .record
            .read(|live| self.strategy.validate_submission(live, &self.state));
        if result.is_valid() {
            tracing::debug!("{} for {} passed validation", self.activity(), self.record.number());
            return Ok(self.transition(Accepted));
        }
        tracing::info!(
            "{} for {} not accepted: {}",
            self.activity(),
            self.record.number(),
            result
        );
        Err((self, result))
    }
}

// =============================================================================
// Accepted
// =============================================================================

impl WorkflowSession<Accepted> {
    /// Go back to editing without submitting.
    pub fn revise(self) -> WorkflowSession<Loaded> {
        self.transition(Loaded)
    }

    /// Commit the activity's status change.
    ///
    /// The strategy works on a copy of the live record; the copy replaces the
    /// live record only if it still validates, all under one lock. On any
    /// failure the record is untouched and the session returns to editing.
    #[must_use = "submission consumes the session; use the returned session"]
    pub fn submit(self) -> SubmitResult {
        let container = self.record.number().clone();
        let activity = self.activity();

        if self.token.is_cancelled() {
            tracing::debug!("{} submission for {} cancelled", activity, container);
            return Err((self.transition(Loaded), SubmitError::Cancelled));
        }

        let Some(_guard) = self.engine.claim((container.clone(), activity)) else {
            tracing::warn!("{} submission for {} already in progress", activity, container);
            return Err((
                self.transition(Loaded),
                SubmitError::InFlight {
                    container,
                    activity,
                },
            ));
        };

        let strategy = &self.strategy;
        let state = &self.state;
        let committed = self.record.update(|live| {
            let result = strategy.validate_submission(live, state);
            if !result.is_valid() {
                return Err(SubmitError::Invalid(result));
            }

            let mut draft = live.clone();
            if !strategy.submit(&mut draft, state) {
                return Err(SubmitError::NotApplied {
                    container: container.clone(),
                    activity,
                });
            }
            draft.update_activities();

            let changes = draft.status_changes_since(live);
            *live = draft;
            Ok(changes)
        });

        match committed {
            Ok(changes) => {
                let events: Vec<StatusChanged> = changes
                    .into_iter()
                    .map(|change| StatusChanged::new(container.clone(), change))
                    .collect();
                self.engine.publish(&events);
                tracing::info!(
                    "{} submitted for {} ({} status changes)",
                    activity,
                    container,
                    events.len()
                );
                Ok(self.transition(Completed { changes: events }))
            }
            Err(e) => {
                tracing::warn!("{} submission for {} failed: {}", activity, container, e);
                Err((self.transition(Loaded), e))
            }
        }
    }
}

// =============================================================================
// Completed
// =============================================================================

impl WorkflowSession<Completed> {
    /// Status changes this submission committed, in activity order.
    pub fn changes(&self) -> &[StatusChanged] {
        &self.stage.changes
    }
}
