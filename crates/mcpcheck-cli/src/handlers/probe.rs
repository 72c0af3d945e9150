//! Probe handler: run every check and print the report to stdout.

use anyhow::{Context, Result};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Run the probes. Collaborator failures are part of the report, not errors;
/// this only fails when stdout cannot be written.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let mut out = std::io::stdout();
    let report = ctx
        .runner
        .run(&mut out)
        .await
        .map_err(CliError::from)
        .context("Failed to write probe report")?;

    tracing::debug!(
        passed = report.passed_count(),
        failed = report.failed_count(),
        "Probe report written"
    );

    Ok(())
}
