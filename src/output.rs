//! Simple Output and Reporting
//!
//! This module provides the human-readable summary printed after a build.

use std::time::Duration;

use crate::builder::BuildReport;
use crate::cli::VerbosityLevel;

/// Simple output formatter for human-readable results
pub struct Output {
    verbosity: VerbosityLevel,
    show_colors: bool,
}

impl Output {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    /// Formatter with colors forced off
    pub fn plain(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_colors: false,
        }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    pub fn format_report(&self, report: &BuildReport) -> String {
        let mut output = String::new();

        match self.verbosity {
            VerbosityLevel::Quiet => {}
            VerbosityLevel::Normal | VerbosityLevel::Verbose => {
                output.push_str(&format!(
                    "{}  {}\n",
                    self.colorize("✓ WRITTEN", "32"),
                    report.path.display()
                ));
                output.push_str(&format!("  Entries: {}\n", report.entry_count));
                output.push_str(&format!("  Size: {} bytes\n", report.bytes.len()));
                output.push_str(&format!(
                    "  Duration: {}\n",
                    format_duration(report.duration)
                ));

                if self.verbosity >= VerbosityLevel::Verbose && !report.entries_per_type.is_empty() {
                    output.push_str("\nEntries per type:\n");
                    for (doc_type, count) in &report.entries_per_type {
                        output.push_str(&format!("  {}: {}\n", doc_type, count));
                    }
                }
            }
        }

        output
    }
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 1.0 {
        format!("{:.0}ms", duration.as_millis())
    } else if total_secs < 60.0 {
        format!("{:.2}s", total_secs)
    } else {
        let mins = (total_secs / 60.0) as u64;
        let secs = total_secs % 60.0;
        format!("{}m{:.1}s", mins, secs)
    }
}
