//! CLI Doctor Command
//!
//! Checks the config file and reports what would keep analysis from working.

use std::path::Path;

use anyhow::Result;
use truthlens_config::{load_with_report, ValidationReport};

use crate::output::{note_error, note_success, note_warn};

/// Run every check and print the findings. Returns whether the config is usable.
pub async fn run(path: &Path) -> Result<bool> {
    println!("\n🔍 Running TruthLens Doctor...\n");
    println!("Config file: {}", path.display());
    if !path.exists() {
        note_warn("Config file not found; built-in defaults apply");
    }

    let report = match load_with_report(path).await {
        Ok((_, report)) => report,
        Err(e) => {
            note_error(&format!("{e:#}"));
            return Ok(false);
        }
    };
    print_report(&report);

    println!();
    if report.is_valid() {
        note_success("All checks passed! TruthLens is ready.");
    } else {
        note_error("Some checks failed! Please fix the errors above.");
    }
    Ok(report.is_valid())
}

fn print_report(report: &ValidationReport) {
    for error in &report.errors {
        println!("  🔴 {}: {}", error.path, error.message);
    }
    for warning in &report.warnings {
        println!("  🟡 {}: {}", warning.path, warning.message);
    }
    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("  🟢 No issues found");
    }
}
