//! Report rendering
//!
//! The text reporter streams progress as checks run; the JSON reporter emits
//! a single document once the run is complete.

use std::io::{self, Write};

use serde::Serialize;

use crate::runner::{CheckReport, CheckResult, CheckStatus, ReportSummary};

const RULE_WIDTH: usize = 60;

/// Receives progress from the runner
pub trait Reporter {
    fn begin(&mut self) -> io::Result<()>;
    fn check_started(&mut self, name: &str) -> io::Result<()>;
    fn check_finished(&mut self, result: &CheckResult) -> io::Result<()>;
    fn finish(&mut self, report: &CheckReport) -> io::Result<()>;
}

/// Status label used in the text report
pub fn status_label(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "✅ PASS",
        CheckStatus::Warning => "⚠️  WARNING",
        CheckStatus::Error => "❌ ERROR",
    }
}

/// Report heading, prefixed with the project name when configured
pub fn report_title(app_name: Option<&str>) -> String {
    match app_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("{name} - Database Configuration Validator"),
        None => "Database Configuration Validator".to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Text
// ─────────────────────────────────────────────────────────────────

/// Human-readable report
pub struct TextReporter<W: Write> {
    out: W,
    title: String,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W, app_name: Option<&str>) -> Self {
        Self {
            out,
            title: report_title(app_name),
        }
    }

    fn rule(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn begin(&mut self) -> io::Result<()> {
        self.rule()?;
        writeln!(self.out, "{}", self.title)?;
        self.rule()?;
        writeln!(self.out)
    }

    fn check_started(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "Checking {name}...")?;
        self.out.flush()
    }

    fn check_finished(&mut self, result: &CheckResult) -> io::Result<()> {
        writeln!(self.out, "{}: {}", status_label(result.status), result.message)?;
        writeln!(self.out)
    }

    fn finish(&mut self, report: &CheckReport) -> io::Result<()> {
        self.rule()?;
        if report.all_passed() {
            writeln!(self.out, "✅ All checks passed! Your configuration looks good.")?;
        } else {
            writeln!(self.out, "⚠️  Some checks failed. Please review the warnings above.")?;
        }
        self.rule()?;
        self.out.flush()
    }
}

// ─────────────────────────────────────────────────────────────────
// JSON
// ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonReport<'a> {
    all_passed: bool,
    summary: ReportSummary,
    total_duration_ms: u64,
    results: &'a [CheckResult],
}

/// Machine-readable report, written once at the end
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn check_started(&mut self, _name: &str) -> io::Result<()> {
        Ok(())
    }

    fn check_finished(&mut self, _result: &CheckResult) -> io::Result<()> {
        Ok(())
    }

    fn finish(&mut self, report: &CheckReport) -> io::Result<()> {
        let document = JsonReport {
            all_passed: report.all_passed(),
            summary: report.summary(),
            total_duration_ms: report.total_duration_ms,
            results: &report.results,
        };
        serde_json::to_writer_pretty(&mut self.out, &document)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
