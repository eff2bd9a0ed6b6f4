//! CSV report writer

use super::{ActivityReport, ExportError, ReportSink};
use gait_common::config::OutputFormat;
use gait_common::layout::REPORT_HEADERS;
use std::path::Path;

/// Writes reports as comma-separated text with a header record
#[derive(Debug, Default)]
pub struct CsvReportWriter;

impl CsvReportWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for CsvReportWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn write(&self, report: &ActivityReport, path: &Path) -> Result<(), ExportError> {
        let mut writer = ::csv::Writer::from_path(path)?;

        writer.write_record(REPORT_HEADERS)?;
        for row in &report.trial_rows {
            writer.write_record(row.fields())?;
        }
        writer.write_record(std::iter::repeat("").take(REPORT_HEADERS.len()))?;
        for row in &report.average_rows {
            writer.write_record(row.fields())?;
        }

        writer.flush()?;
        Ok(())
    }
}
