//! Filter command - Split the Lichess puzzle database into theme pools

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

use packnav::puzzles::filter::{filter_file, presets};
use packnav::puzzles::FilterReport;

/// Format the outcome of a filtering run
pub fn format_report(report: &FilterReport, paths: &[PathBuf]) -> String {
    let mut lines = vec![];

    lines.push(format!("Rows read: {}", report.rows));
    if report.skipped > 0 {
        lines.push(format!(
            "Skipped: {}",
            report.skipped.to_string().yellow()
        ));
    }

    lines.push(String::new());

    for ((name, count), path) in report.matches.iter().zip(paths) {
        lines.push(format!(
            "{} {}: {} -> {}",
            "Wrote:".green(),
            name,
            count,
            path.display()
        ));
    }

    lines.join("\n")
}

/// Execute the filter command
pub fn execute(input: &Path, out_dir: &Path, names: &[String]) -> Result<()> {
    let filters = presets(names).context("Invalid preset")?;

    let (report, paths) = filter_file(input, out_dir, &filters)
        .with_context(|| format!("Failed to filter {}", input.display()))?;

    println!("{}", format_report(&report, &paths));
    Ok(())
}
