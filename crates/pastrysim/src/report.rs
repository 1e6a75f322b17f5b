//! Text and JSON rendering of experiment results

use crate::experiment::{ExperimentReport, ExponentResult};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Run parameters, printed before any results
pub fn render_header(report: &ExperimentReport) -> String {
    let config = &report.config;
    let mut out = String::new();
    let _ = writeln!(out, "Number of Nodes - Lower Bound: {}", config.nodes.lower);
    let _ = writeln!(out, "Number of Nodes - Upper Bound: {}", config.nodes.upper);
    let _ = writeln!(out, "Increment: {}", config.nodes.step);
    let _ = writeln!(out, "Number of trials: {}", config.trials);
    let _ = writeln!(out, "Seed: {}", config.seed);
    out
}

/// Table of hop counts for one radix exponent
pub fn render_exponent(result: &ExponentResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "For b = {}", result.radix_exponent);
    let _ = writeln!(out, "\n N \t H");

    for point in &result.points {
        let _ = write!(out, "{}", point.nodes);
        for mean in &point.batch_means {
            let _ = write!(out, "\t{}", mean);
        }
        let _ = writeln!(
            out,
            "\n\t Mean = {:.2}, Expected = {:.2}, Standard Deviation = {:.2}, Stalls = {}/{}",
            point.mean, point.expected, point.stddev, point.stalls, point.trials
        );
    }

    let _ = writeln!(out, "\nchi^2   = {:.5}", result.chi_square);
    let _ = writeln!(out, "p-value = {:.5}", result.p_value);
    out
}

pub fn render_text(report: &ExperimentReport) -> String {
    let mut out = render_header(report);
    for result in &report.results {
        out.push('\n');
        out.push_str(&render_exponent(result));
    }
    out
}

/// Write the full report, including the plotted series, as JSON
pub fn write_json(report: &ExperimentReport, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).context("Failed to write JSON report")?;
    writer.flush()?;
    Ok(())
}
