// ABOUTME: Submit command implementation.
// ABOUTME: Replays a session script through the workflow and commits the result.

use std::path::Path;
use yardcheck::activity::ValidationResult;
use yardcheck::config::Config;
use yardcheck::error::{Error, Result};
use yardcheck::output::Output;
use yardcheck::record::ActivityKind;
use yardcheck::workflow::{SessionScript, WorkflowEngine};

/// Each activity raises at most one confirmation gate.
const MAX_VALIDATION_ROUNDS: usize = 2;

pub async fn submit(
    config: &Config,
    raw: &str,
    activity: ActivityKind,
    input: &Path,
    yes: bool,
    output: &mut Output,
) -> Result<()> {
    output.start_timer();
    let script = SessionScript::from_yaml(&std::fs::read_to_string(input)?)?;
    let engine = WorkflowEngine::from_config(config)?;
    let record = engine.lookup(raw).await?;

    output.progress(&format!("  → Loading {activity} data for {}...", record.number()));
    let mut session = engine.open(activity, &record).await?;
    for warning in session.diagnostics().warnings() {
        output.warning(&warning.message);
    }
    if !session.has_data() {
        output.progress("  → No activity data, using defaults");
    }

    for index in script.apply(&mut session) {
        output.warning(&format!("no code at index {index}"));
    }

    let mut rounds = 0;
    let accepted = loop {
        rounds += 1;
        match session.validate() {
            Ok(accepted) => break accepted,
            Err((back, ValidationResult::NeedsConfirmation(confirmation)))
                if yes && rounds <= MAX_VALIDATION_ROUNDS =>
            {
                output.progress(&format!("  → Confirmed: {}", confirmation.message));
                session = back;
                session.confirm(confirmation.kind);
            }
            Err((_, ValidationResult::NeedsConfirmation(confirmation))) => {
                return Err(Error::ConfirmationRequired(confirmation.message));
            }
            Err((_, result)) => return Err(Error::Validation(result.to_string())),
        }
    };

    let completed = accepted.submit().map_err(|(_, e)| Error::Submit(e))?;
    for change in completed.changes() {
        output.progress(&format!(
            "  → {}: {} → {}",
            change.activity, change.from, change.to
        ));
    }

    let snapshot = completed.snapshot();
    output.report(
        &format!("{activity} submitted for {}", snapshot.number()),
        &completed.changes(),
    );
    Ok(())
}
