use crate::errors::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Defines the possible output formats for a replace run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// A simple, human-readable text format.
    Text,
    /// JSON format, suitable for machine processing.
    Json,
    /// One row per modified file.
    Csv,
}

/// A file the run changed (or would change, in a dry run).
#[derive(Debug, Clone, Serialize)]
pub struct FileChange {
    pub path: PathBuf,
    pub changes: usize,
}

/// Totals of a `replace` run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scanned: usize,
    pub modified: usize,
    pub total_changes: usize,
    pub dry_run: bool,
    pub finished_at: DateTime<Utc>,
    pub files: Vec<FileChange>,
}

impl RunSummary {
    pub fn new(scanned: usize, files: Vec<FileChange>, dry_run: bool) -> Self {
        Self {
            scanned,
            modified: files.len(),
            total_changes: files.iter().map(|f| f.changes).sum(),
            dry_run,
            finished_at: Utc::now(),
            files,
        }
    }
}

/// Writes a [`RunSummary`] in the selected format.
pub struct Reporter {
    format: ReportFormat,
    list_files: bool,
}

impl Reporter {
    /// `list_files` only affects the text format; JSON and CSV always list files.
    pub fn new(format: ReportFormat, list_files: bool) -> Self {
        Self { format, list_files }
    }

    pub fn write<W: Write>(&self, writer: &mut W, summary: &RunSummary) -> Result<()> {
        match self.format {
            ReportFormat::Text => self.write_text(writer, summary),
            ReportFormat::Json => {
                #[derive(Serialize)]
                struct JsonOutput<'a> {
                    tool: &'static str,
                    version: &'static str,
                    #[serde(flatten)]
                    summary: &'a RunSummary,
                }

                let output = JsonOutput {
                    tool: env!("CARGO_PKG_NAME"),
                    version: env!("CARGO_PKG_VERSION"),
                    summary,
                };
                serde_json::to_writer_pretty(&mut *writer, &output)?;
                writeln!(writer)?;
                Ok(())
            }
            ReportFormat::Csv => {
                let mut csv_writer = csv::Writer::from_writer(writer);
                csv_writer.write_record(["path", "changes"])?;
                for file in &summary.files {
                    csv_writer.write_record([
                        file.path.display().to_string(),
                        file.changes.to_string(),
                    ])?;
                }
                csv_writer.flush()?;
                Ok(())
            }
        }
    }

    fn write_text<W: Write>(&self, writer: &mut W, summary: &RunSummary) -> Result<()> {
        if self.list_files {
            let prefix = if summary.dry_run { "DRY Modified" } else { "Modified" };
            for file in &summary.files {
                writeln!(writer, "{prefix} {} ({} changes)", file.path.display(), file.changes)?;
            }
        }

        writeln!(writer, "\n{}", "-".repeat(50))?;
        writeln!(writer, "Files scanned : {}", summary.scanned)?;
        writeln!(writer, "Files changed : {}", summary.modified)?;
        writeln!(writer, "Total edits   : {}", summary.total_changes)?;
        Ok(())
    }
}
