//! Sequential check runner and the report it produces

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::checks::Check;
use crate::config::Settings;
use crate::error::Result;
use crate::output::Reporter;

// ─────────────────────────────────────────────────────────────────
// Check Results
// ─────────────────────────────────────────────────────────────────

/// Classification of a single check result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Check ran and passed
    Pass,
    /// Check ran and reported a problem
    Warning,
    /// Check could not be evaluated
    Error,
}

/// Individual check result
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Check name
    pub name: String,

    /// Outcome classification
    pub status: CheckStatus,

    /// Human-readable detail
    pub message: String,

    /// Wall time spent in the check
    pub duration_ms: u64,
}

/// Result counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub passed: usize,
    pub warnings: usize,
    pub errors: usize,
    pub total: usize,
}

/// Results of a full run, in execution order
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub results: Vec<CheckResult>,
    pub total_duration_ms: u64,
}

impl CheckReport {
    /// True when every check passed
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.status == CheckStatus::Pass)
    }

    /// Count results per status
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for result in &self.results {
            summary.total += 1;
            match result.status {
                CheckStatus::Pass => summary.passed += 1,
                CheckStatus::Warning => summary.warnings += 1,
                CheckStatus::Error => summary.errors += 1,
            }
        }
        summary
    }

    /// Process exit code: 0 when all checks passed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Runner
// ─────────────────────────────────────────────────────────────────

/// Runs checks one after another
pub struct CheckRunner {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRunner {
    pub fn new(checks: Vec<Box<dyn Check>>) -> Self {
        Self { checks }
    }

    /// Run every check in order, streaming progress to the reporter.
    ///
    /// Errors returned by a check never abort the run; only a failing
    /// reporter does.
    pub fn run(&self, settings: &Settings, reporter: &mut dyn Reporter) -> Result<CheckReport> {
        let started = Instant::now();
        let mut report = CheckReport::default();

        reporter.begin()?;

        for check in &self.checks {
            let name = check.name();
            let span = info_span!("check", check = name);
            let _entered = span.enter();

            reporter.check_started(name)?;

            let check_started = Instant::now();
            let (status, message) = match check.run(settings) {
                Ok(outcome) if outcome.passed => (CheckStatus::Pass, outcome.message),
                Ok(outcome) => (CheckStatus::Warning, outcome.message),
                Err(e) => (CheckStatus::Error, format!("{e:#}")),
            };
            let duration_ms = check_started.elapsed().as_millis() as u64;

            match status {
                CheckStatus::Pass => debug!(duration_ms, "Check passed"),
                _ => info!(?status, message = %message, duration_ms, "Check did not pass"),
            }

            let result = CheckResult {
                name: name.to_string(),
                status,
                message,
                duration_ms,
            };
            reporter.check_finished(&result)?;
            report.results.push(result);
        }

        report.total_duration_ms = started.elapsed().as_millis() as u64;
        reporter.finish(&report)?;

        Ok(report)
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
