//! Run statistics
//!
//! Counters for everything the run skipped or processed, logged at the end
//! of a run and exported with `--summary-json`.

use crate::analysis::SkipReason;
use crate::services::{ColumnError, ExtractError};
use serde::{Deserialize, Serialize};

/// Trials skipped, by reason
///
/// Display: "N sheets missing, M columns missing, ..."
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    /// No sheet matching the trial number
    pub sheet_missing: usize,
    /// Required column absent
    pub column_missing: usize,
    /// Populated cell that is not a finite number
    pub non_numeric: usize,
    /// Heel marker series empty
    pub empty_series: usize,
    /// No pelvis samples after the heel peak
    pub no_pelvis_after_peak: usize,
    /// Window end not after its start
    pub invalid_window: usize,
    /// Joint-angle series ends before the window
    pub window_beyond_series: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.sheet_missing
            + self.column_missing
            + self.non_numeric
            + self.empty_series
            + self.no_pelvis_after_peak
            + self.invalid_window
            + self.window_beyond_series
    }

    pub fn display_string(&self) -> String {
        format!(
            "{} sheets missing, {} columns missing, {} non-numeric, {} empty series, \
             {} without pelvis after peak, {} invalid windows, {} windows beyond series",
            self.sheet_missing,
            self.column_missing,
            self.non_numeric,
            self.empty_series,
            self.no_pelvis_after_peak,
            self.invalid_window,
            self.window_beyond_series
        )
    }

    fn merge(&mut self, other: &SkipCounts) {
        self.sheet_missing += other.sheet_missing;
        self.column_missing += other.column_missing;
        self.non_numeric += other.non_numeric;
        self.empty_series += other.empty_series;
        self.no_pelvis_after_peak += other.no_pelvis_after_peak;
        self.invalid_window += other.invalid_window;
        self.window_beyond_series += other.window_beyond_series;
    }
}

/// Whole-run statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Collection days visited
    pub days_scanned: usize,
    /// Expected day or activity folders that were absent
    pub missing_folders: usize,
    /// Activity sides lacking the markers or kinematics workbook
    pub sides_missing_workbooks: usize,
    /// Day/activity units without an analysis (recognized, not implemented)
    pub unimplemented_units: usize,
    /// Trials that produced a result
    pub trials_processed: usize,
    pub skipped: SkipCounts,
    /// Wall-clock run time
    pub elapsed_ms: u64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_extract_failure(&mut self, error: &ExtractError) {
        match error {
            ExtractError::SheetNotFound { .. } => self.skipped.sheet_missing += 1,
            ExtractError::Column { error, .. } => match error {
                ColumnError::NonNumeric { .. } => self.skipped.non_numeric += 1,
                ColumnError::SheetNotFound(_)
                | ColumnError::InvalidColumn(_)
                | ColumnError::ColumnNotFound { .. } => self.skipped.column_missing += 1,
            },
        }
    }

    pub fn record_skip(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::EmptyHeelMarker => self.skipped.empty_series += 1,
            SkipReason::NoPelvisAfterPeak { .. } => self.skipped.no_pelvis_after_peak += 1,
            SkipReason::InvalidWindow { .. } => self.skipped.invalid_window += 1,
            SkipReason::WindowBeyondSeries { .. } => self.skipped.window_beyond_series += 1,
        }
    }

    /// Fold in counters collected by an independent unit of work
    pub fn merge(&mut self, other: &RunStatistics) {
        self.days_scanned += other.days_scanned;
        self.missing_folders += other.missing_folders;
        self.sides_missing_workbooks += other.sides_missing_workbooks;
        self.unimplemented_units += other.unimplemented_units;
        self.trials_processed += other.trials_processed;
        self.skipped.merge(&other.skipped);
        self.elapsed_ms = self.elapsed_ms.max(other.elapsed_ms);
    }

    pub fn trials_skipped(&self) -> usize {
        self.skipped.total()
    }

    pub fn display_string(&self) -> String {
        format!(
            "{} days, {} trials processed, {} trials skipped, {} missing folders, \
             {} sides without workbooks, {} unimplemented units, {:.2}s",
            self.days_scanned,
            self.trials_processed,
            self.trials_skipped(),
            self.missing_folders,
            self.sides_missing_workbooks,
            self.unimplemented_units,
            self.elapsed_ms as f64 / 1000.0
        )
    }
}
