//! Probe runner - drives the four collaborator checks.
//!
//! Checks run strictly in order, one at a time. Each check catches its own
//! collaborator error and turns it into a failure line; nothing a
//! collaborator does can stop the next check from running. The only errors
//! that escape [`ProbeRunner::run`] are failures to write the output itself.

use std::io::{self, Write};

use chrono::Utc;

use crate::domain::{
    GRAPH_PROBE_QUERY, ProbeKind, ProbeOutcome, ProbeRecord, ProbeReport, ProbeResult, probe_key,
};
use crate::ports::{CollaboratorError, Collaborators};

/// First line of the output.
pub const HEADER_LINE: &str = "🧪 Testing MCPs do AI-OS...";

/// Last line of the output, printed no matter how many checks failed.
pub const COMPLETION_LINE: &str = "✅ Test completed!";

/// Sequential runner over the injected collaborators.
pub struct ProbeRunner {
    collaborators: Collaborators,
    user_id: Option<String>,
}

impl ProbeRunner {
    /// Create a runner. `user_id` goes into the memory probe record.
    pub const fn new(collaborators: Collaborators, user_id: Option<String>) -> Self {
        Self {
            collaborators,
            user_id,
        }
    }

    /// Run every check and write the human-readable report to `out`.
    pub async fn run<W: Write>(&self, out: &mut W) -> io::Result<ProbeReport> {
        let mut report = ProbeReport::default();

        writeln!(out, "{HEADER_LINE}")?;
        writeln!(out)?;

        for kind in ProbeKind::ALL {
            if kind != ProbeKind::Orchestrator {
                writeln!(out)?;
            }
            writeln!(out, "{}", kind.heading())?;
            out.flush()?;

            let result = ProbeResult::new(kind, self.check(kind).await);
            writeln!(out, "{}", result.status_line())?;
            report.push(result);
        }

        writeln!(out)?;
        writeln!(out, "{COMPLETION_LINE}")?;
        out.flush()?;

        tracing::info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            "Probe run finished"
        );

        Ok(report)
    }

    /// Run a single check by kind.
    pub async fn check(&self, kind: ProbeKind) -> ProbeOutcome {
        let outcome = match kind {
            ProbeKind::Orchestrator => self.check_orchestrator().await,
            ProbeKind::MemoryHub => self.check_memory().await,
            ProbeKind::ContextManager => self.check_context().await,
            ProbeKind::DocumentGraph => self.check_graph().await,
        };

        if let ProbeOutcome::Failed { message } = &outcome {
            tracing::debug!(probe = %kind, error = %message, "Probe failed");
        }

        outcome
    }

    /// List workflows and report how many there are.
    pub async fn check_orchestrator(&self) -> ProbeOutcome {
        match self.collaborators.orchestrator.list_workflows().await {
            Ok(workflows) => ProbeOutcome::Passed {
                detail: format!("{} workflows available", workflows.len()),
            },
            Err(e) => ProbeOutcome::failed(e.to_string()),
        }
    }

    /// Store, retrieve, then delete a uniquely keyed record.
    pub async fn check_memory(&self) -> ProbeOutcome {
        let key = probe_key(Utc::now());
        let record = ProbeRecord::new(self.user_id.clone());

        match self.memory_round_trip(&key, &record).await {
            Ok(()) => ProbeOutcome::working(),
            Err(e) => ProbeOutcome::failed(e.to_string()),
        }
    }

    async fn memory_round_trip(
        &self,
        key: &str,
        record: &ProbeRecord,
    ) -> Result<(), CollaboratorError> {
        let memory = &self.collaborators.memory;

        memory.store(key, record).await?;
        let data = memory.retrieve(key).await?;

        // Availability check only: a mismatch does not fail the probe.
        if !record.matches(&data) {
            tracing::warn!(key = %key, retrieved = %data, "Retrieved value differs from stored record");
        }

        memory.delete(key).await?;
        tracing::debug!(key = %key, "Memory round trip complete");
        Ok(())
    }

    /// Ask for the project structure.
    pub async fn check_context(&self) -> ProbeOutcome {
        match self.collaborators.context.get_project_structure().await {
            Ok(_) => ProbeOutcome::working(),
            Err(e) => ProbeOutcome::failed(e.to_string()),
        }
    }

    /// Run the fixed count query against the graph.
    pub async fn check_graph(&self) -> ProbeOutcome {
        match self.collaborators.graph.query(GRAPH_PROBE_QUERY).await {
            Ok(_) => ProbeOutcome::working(),
            Err(e) => ProbeOutcome::failed(e.to_string()),
        }
    }
}
