//! Probe identities and outcomes.

use std::fmt;

/// Fixed query sent to the graph collaborator.
pub const GRAPH_PROBE_QUERY: &str = "MATCH (n) RETURN count(n) as count LIMIT 1";

/// The four checks, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    Orchestrator,
    MemoryHub,
    ContextManager,
    DocumentGraph,
}

impl ProbeKind {
    /// All probes in execution order.
    pub const ALL: [Self; 4] = [
        Self::Orchestrator,
        Self::MemoryHub,
        Self::ContextManager,
        Self::DocumentGraph,
    ];

    /// Label printed in the heading and result lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Orchestrator => "Orchestrator",
            Self::MemoryHub => "Memory Hub",
            Self::ContextManager => "Context Manager",
            Self::DocumentGraph => "Document Graph",
        }
    }

    /// 1-based position used in the heading line.
    pub const fn ordinal(self) -> usize {
        match self {
            Self::Orchestrator => 1,
            Self::MemoryHub => 2,
            Self::ContextManager => 3,
            Self::DocumentGraph => 4,
        }
    }

    /// Heading printed before the check runs, e.g. `1. Testing Orchestrator...`.
    pub fn heading(self) -> String {
        format!("{}. Testing {}...", self.ordinal(), self.label())
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The collaborator call(s) resolved. `detail` is the text after the label.
    Passed { detail: String },
    /// A collaborator call failed with this message.
    Failed { message: String },
}

impl ProbeOutcome {
    /// Generic success, reported as `Working`.
    pub fn working() -> Self {
        Self::Passed {
            detail: "Working".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }
}

/// A check paired with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub kind: ProbeKind,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub const fn new(kind: ProbeKind, outcome: ProbeOutcome) -> Self {
        Self { kind, outcome }
    }

    /// The line printed for this result.
    ///
    /// `✅ <Label>: <detail>` on success, `❌ <Label>: <message>` on failure.
    pub fn status_line(&self) -> String {
        match &self.outcome {
            ProbeOutcome::Passed { detail } => format!("✅ {}: {detail}", self.kind),
            ProbeOutcome::Failed { message } => format!("❌ {}: {message}", self.kind),
        }
    }
}

/// Outcomes of one run, in execution order.
///
/// Kept in-process for callers and tests; never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
    pub results: Vec<ProbeResult>,
}

impl ProbeReport {
    pub fn push(&mut self, result: ProbeResult) {
        self.results.push(result);
    }

    pub fn get(&self, kind: ProbeKind) -> Option<&ProbeOutcome> {
        self.results
            .iter()
            .find(|r| r.kind == kind)
            .map(|r| &r.outcome)
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_follow_execution_order() {
        let headings: Vec<String> = ProbeKind::ALL.iter().map(|k| k.heading()).collect();
        assert_eq!(
            headings,
            vec![
                "1. Testing Orchestrator...",
                "2. Testing Memory Hub...",
                "3. Testing Context Manager...",
                "4. Testing Document Graph...",
            ]
        );
    }

    #[test]
    fn test_status_lines() {
        let ok = ProbeResult::new(
            ProbeKind::Orchestrator,
            ProbeOutcome::Passed {
                detail: "3 workflows available".to_string(),
            },
        );
        assert_eq!(ok.status_line(), "✅ Orchestrator: 3 workflows available");

        let err = ProbeResult::new(
            ProbeKind::DocumentGraph,
            ProbeOutcome::failed("connection refused"),
        );
        assert_eq!(err.status_line(), "❌ Document Graph: connection refused");
    }

    #[test]
    fn test_report_counts() {
        let mut report = ProbeReport::default();
        report.push(ProbeResult::new(
            ProbeKind::MemoryHub,
            ProbeOutcome::working(),
        ));
        report.push(ProbeResult::new(
            ProbeKind::ContextManager,
            ProbeOutcome::failed("boom"),
        ));

        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(
            report.get(ProbeKind::ContextManager),
            Some(&ProbeOutcome::failed("boom"))
        );
        assert!(report.get(ProbeKind::DocumentGraph).is_none());
    }
}
