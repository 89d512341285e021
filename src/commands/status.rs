// ABOUTME: Status command implementation.
// ABOUTME: Looks a container up through the directory and prints its activities.

use serde::Serialize;
use yardcheck::config::Config;
use yardcheck::error::Result;
use yardcheck::output::Output;
use yardcheck::record::{ActivityEntry, ActivityStatus};
use yardcheck::types::ContainerNumber;
use yardcheck::workflow::WorkflowEngine;

#[derive(Serialize)]
struct StatusReport<'a> {
    container: &'a ContainerNumber,
    customer_code: &'a str,
    overall: ActivityStatus,
    activities: &'a [ActivityEntry],
}

pub async fn status(config: &Config, raw: &str, output: &mut Output) -> Result<()> {
    output.start_timer();
    let engine = WorkflowEngine::from_config(config)?;
    let record = engine.lookup(raw).await?.snapshot();

    let mut lines = vec![format!(
        "{} (customer {})",
        record.number(),
        record.customer_code
    )];
    for entry in record.activities() {
        lines.push(format!("  {:<10} {}", entry.name, entry.status));
    }

    output.report(
        &lines.join("\n"),
        &StatusReport {
            container: record.number(),
            customer_code: &record.customer_code,
            overall: record.overall_status(),
            activities: record.activities(),
        },
    );
    Ok(())
}
