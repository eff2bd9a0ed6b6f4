//! Result reports
//!
//! One tabular report per activity: a header row, one row per trial, a blank
//! separator row, then one row per group average. Sinks only lay the rows
//! out in their file format; row content is shaped here.

pub mod csv;
pub mod xlsx;

use gait_common::config::OutputFormat;
use gait_common::layout::{average_row_label, day_label, report_file_stem, trial_row_label};
use gait_common::{Activity, GroupAverage, JointAngles, TrialResult};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub use self::csv::CsvReportWriter;
pub use self::xlsx::XlsxReportWriter;

/// Report writing errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Excel writer error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV writer error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One data row of a report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub label: String,
    pub side: String,
    pub day: String,
    /// Adduction, flexion, knee flexion, internal rotation (header order)
    pub values: [f64; 4],
}

impl ReportRow {
    fn new(label: String, side: &str, day: u32, angles: &JointAngles) -> Self {
        Self {
            label,
            side: side.to_string(),
            day: day_label(day),
            values: [
                angles.hip_adduction,
                angles.hip_flexion,
                angles.knee_flexion,
                angles.hip_internal_rotation,
            ],
        }
    }

    /// Row cells as text, in header order
    pub fn fields(&self) -> Vec<String> {
        let mut fields = vec![self.label.clone(), self.side.clone(), self.day.clone()];
        fields.extend(self.values.iter().map(|v| v.to_string()));
        fields
    }
}

/// Rows of one activity's report
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityReport {
    pub activity: Activity,
    pub trial_rows: Vec<ReportRow>,
    pub average_rows: Vec<ReportRow>,
}

impl ActivityReport {
    /// Select and shape the rows belonging to an activity
    ///
    /// Input order is preserved for both sections.
    pub fn build(activity: Activity, results: &[TrialResult], averages: &[GroupAverage]) -> Self {
        let trial_rows = results
            .iter()
            .filter(|r| r.activity == activity)
            .map(|r| {
                ReportRow::new(
                    trial_row_label(activity, r.trial),
                    r.side.label(),
                    r.day,
                    &r.maxima,
                )
            })
            .collect();

        let average_rows = averages
            .iter()
            .filter(|a| a.activity == activity)
            .map(|a| ReportRow::new(average_row_label(activity), a.side.label(), a.day, &a.means))
            .collect();

        Self {
            activity,
            trial_rows,
            average_rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trial_rows.is_empty() && self.average_rows.is_empty()
    }
}

/// Destination format for activity reports
pub trait ReportSink: Send + Sync {
    fn format(&self) -> OutputFormat;

    fn write(&self, report: &ActivityReport, path: &Path) -> Result<(), ExportError>;
}

/// Report file path for an activity
pub fn report_path(folder: &Path, activity: Activity, format: OutputFormat) -> PathBuf {
    folder.join(format!("{}.{}", report_file_stem(activity), format.extension()))
}

/// Sink for a configured output format
pub fn sink_for(format: OutputFormat) -> Box<dyn ReportSink> {
    match format {
        OutputFormat::Xlsx => Box::new(XlsxReportWriter::new()),
        OutputFormat::Csv => Box::new(CsvReportWriter::new()),
    }
}

/// Write one report per activity into `folder`
///
/// Activities without results still get a header-only report.
pub fn write_reports(
    sink: &dyn ReportSink,
    folder: &Path,
    results: &[TrialResult],
    averages: &[GroupAverage],
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(folder)?;

    let mut written = Vec::with_capacity(Activity::ALL.len());
    for activity in Activity::ALL {
        let report = ActivityReport::build(activity, results, averages);
        let path = report_path(folder, activity, sink.format());
        sink.write(&report, &path)?;
        info!(
            "Results saved to {} ({} trials, {} averages)",
            path.display(),
            report.trial_rows.len(),
            report.average_rows.len()
        );
        written.push(path);
    }
    Ok(written)
}
