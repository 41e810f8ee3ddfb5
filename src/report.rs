// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Rendering of vetter reports for the CLI.

use crate::vetters::VetterReport;
use std::fmt;

/// Total number of findings across reports.
#[must_use]
pub fn finding_count(reports: &[VetterReport]) -> usize {
    reports.iter().map(|report| report.findings.len()).sum()
}

/// One header line per vetter, then one block per finding.
impl fmt::Display for VetterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}: {} finding(s)",
            self.vetter.id,
            self.vetter.version,
            self.findings.len()
        )?;
        for finding in &self.findings {
            writeln!(
                f,
                "  [{}] {}: {}",
                finding.severity,
                finding.kind,
                finding.rendered_summary()
            )?;
            writeln!(f, "    {}", finding.rendered_message())?;
            writeln!(f, "    id: {}", finding.id)?;
        }
        Ok(())
    }
}

/// Render reports as human readable text, one block per finding.
#[must_use]
pub fn render_text(reports: &[VetterReport]) -> String {
    reports.iter().map(ToString::to_string).collect()
}

/// Render reports as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(reports: &[VetterReport]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(reports)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
