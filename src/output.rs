//! Report destinations
//!
//! A rendered report goes either to a file or to stdout. On stdout the
//! markdown report is framed by a banner so it stands out from other output;
//! JSON is written bare so it can be piped.

use anyhow::{Context, Result};
use ppk_latency_core::report::ReportFormat;
use std::io::Write;
use std::path::Path;

const BANNER_WIDTH: usize = 80;

/// Write a rendered report to `path`
pub fn save_report(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)
        .with_context(|| format!("Error writing output file {}", path.display()))?;
    tracing::info!(path = %path.display(), "Results saved");
    Ok(())
}

/// Print a rendered report to `out`
pub fn print_report<W: Write>(out: &mut W, text: &str, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Markdown => {
            let rule = "=".repeat(BANNER_WIDTH);
            writeln!(out, "\n{rule}")?;
            writeln!(out, "MARKDOWN TABLE OUTPUT")?;
            writeln!(out, "{rule}")?;
            writeln!(out, "{text}")?;
            writeln!(out, "{rule}")?;
        }
        ReportFormat::Json => writeln!(out, "{text}")?,
    }
    out.flush()?;
    Ok(())
}
