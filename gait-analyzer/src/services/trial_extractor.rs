//! Trial extractor
//!
//! Pulls the six signals of one trial out of a markers workbook and a
//! kinematics workbook, using the side's fixed column table.

use crate::context::RunContext;
use crate::services::workbook::{ColumnError, ColumnSource};
use gait_common::layout::ColumnLayout;
use gait_common::TrialSignals;
use thiserror::Error;
use tracing::debug;

/// Which workbook of the pair a failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookKind {
    Markers,
    Kinematics,
}

impl WorkbookKind {
    pub fn label(&self) -> &'static str {
        match self {
            WorkbookKind::Markers => "markers",
            WorkbookKind::Kinematics => "kinematics",
        }
    }
}

/// Signals of one trial are unavailable
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractError {
    /// Workbook has no sheet whose name contains the trial number
    #[error("No {} sheet found for trial {trial}", .kind.label())]
    SheetNotFound { kind: WorkbookKind, trial: u32 },

    /// A required column could not be read
    #[error("Cannot read {signal} from {} workbook: {error}", .kind.label())]
    Column {
        kind: WorkbookKind,
        signal: &'static str,
        #[source]
        error: ColumnError,
    },
}

/// Extract one trial's signals
///
/// Both workbooks must hold a sheet matching the trial number. Empty
/// series are returned as-is; the engine decides whether they are usable.
pub fn extract_trial<M, K>(
    markers: &M,
    kinematics: &K,
    ctx: &RunContext,
    trial: u32,
) -> Result<TrialSignals, ExtractError>
where
    M: ColumnSource + ?Sized,
    K: ColumnSource + ?Sized,
{
    let markers_sheet = markers.sheet_for_trial(trial).ok_or(ExtractError::SheetNotFound {
        kind: WorkbookKind::Markers,
        trial,
    })?;
    let kinematics_sheet =
        kinematics
            .sheet_for_trial(trial)
            .ok_or(ExtractError::SheetNotFound {
                kind: WorkbookKind::Kinematics,
                trial,
            })?;

    debug!(
        "Trial {}: markers sheet '{}' ({}), kinematics sheet '{}' ({})",
        trial,
        markers_sheet,
        markers.label(),
        kinematics_sheet,
        kinematics.label()
    );

    let columns = ColumnLayout::for_side(ctx.side);

    let read_markers = |signal: &'static str, column: &str| {
        markers
            .read_column(markers_sheet, column)
            .map_err(|error| ExtractError::Column {
                kind: WorkbookKind::Markers,
                signal,
                error,
            })
    };
    let read_kinematics = |signal: &'static str, column: &str| {
        kinematics
            .read_column(kinematics_sheet, column)
            .map_err(|error| ExtractError::Column {
                kind: WorkbookKind::Kinematics,
                signal,
                error,
            })
    };

    Ok(TrialSignals {
        activity: ctx.activity,
        day: ctx.day,
        side: ctx.side,
        trial,
        heel_marker: read_markers("heel marker", columns.heel_marker)?,
        pelvis_marker: read_markers("pelvis marker", columns.pelvis_marker)?,
        hip_flexion: read_kinematics("hip flexion", columns.hip_flexion)?,
        hip_adduction: read_kinematics("hip adduction", columns.hip_adduction)?,
        hip_internal_rotation: read_kinematics(
            "hip internal rotation",
            columns.hip_internal_rotation,
        )?,
        knee_flexion: read_kinematics("knee flexion", columns.knee_flexion)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gait_common::{Activity, Side};
    use std::collections::HashMap;

    /// In-memory column source keyed by (sheet, column)
    struct MemorySource {
        label: String,
        sheets: Vec<String>,
        columns: HashMap<(String, String), Vec<f64>>,
    }

    impl MemorySource {
        fn new(label: &str, sheets: &[&str]) -> Self {
            Self {
                label: label.to_string(),
                sheets: sheets.iter().map(|s| s.to_string()).collect(),
                columns: HashMap::new(),
            }
        }

        fn with_column(mut self, sheet: &str, column: &str, values: &[f64]) -> Self {
            self.columns
                .insert((sheet.to_string(), column.to_string()), values.to_vec());
            self
        }
    }

    impl ColumnSource for MemorySource {
        fn label(&self) -> &str {
            &self.label
        }

        fn sheet_names(&self) -> Vec<&str> {
            self.sheets.iter().map(|s| s.as_str()).collect()
        }

        fn read_column(&self, sheet: &str, column: &str) -> Result<Vec<f64>, ColumnError> {
            if !self.sheets.iter().any(|s| s == sheet) {
                return Err(ColumnError::SheetNotFound(sheet.to_string()));
            }
            self.columns
                .get(&(sheet.to_string(), column.to_string()))
                .cloned()
                .ok_or_else(|| ColumnError::ColumnNotFound {
                    sheet: sheet.to_string(),
                    column: column.to_string(),
                })
        }
    }

    fn left_pair() -> (MemorySource, MemorySource) {
        let markers = MemorySource::new("m.xlsx", &["T1"])
            .with_column("T1", "AZ", &[1.0, 2.0])
            .with_column("T1", "BO", &[3.0, 4.0])
            // right-side columns must not be picked for the left side
            .with_column("T1", "BI", &[99.0]);
        let kinematics = MemorySource::new("k.xlsx", &["T1"])
            .with_column("T1", "O", &[10.0])
            .with_column("T1", "P", &[20.0])
            .with_column("T1", "Q", &[30.0])
            .with_column("T1", "R", &[40.0]);
        (markers, kinematics)
    }

    #[test]
    fn test_extract_uses_side_column_table() {
        let (markers, kinematics) = left_pair();
        let ctx = RunContext::new(2, Activity::Slhfd, Side::Left);

        let signals = extract_trial(&markers, &kinematics, &ctx, 1).unwrap();

        assert_eq!(signals.heel_marker, vec![1.0, 2.0]);
        assert_eq!(signals.pelvis_marker, vec![3.0, 4.0]);
        assert_eq!(signals.hip_flexion, vec![10.0]);
        assert_eq!(signals.hip_adduction, vec![20.0]);
        assert_eq!(signals.hip_internal_rotation, vec![30.0]);
        assert_eq!(signals.knee_flexion, vec![40.0]);
        assert_eq!(signals.day, 2);
        assert_eq!(signals.trial, 1);
        assert_eq!(signals.side, Side::Left);
        assert_eq!(signals.activity, Activity::Slhfd);
    }

    #[test]
    fn test_missing_kinematics_sheet_fails() {
        let (markers, _) = left_pair();
        let kinematics = MemorySource::new("k.xlsx", &["T2"]);
        let ctx = RunContext::new(1, Activity::Sldl, Side::Left);

        let err = extract_trial(&markers, &kinematics, &ctx, 1).unwrap_err();
        assert_eq!(
            err,
            ExtractError::SheetNotFound {
                kind: WorkbookKind::Kinematics,
                trial: 1
            }
        );
    }

    #[test]
    fn test_missing_column_names_signal() {
        let (markers, kinematics) = left_pair();
        let ctx = RunContext::new(1, Activity::Sldl, Side::Right);

        // Right side needs BL for the pelvis, which the fixture lacks
        let err = extract_trial(&markers, &kinematics, &ctx, 1).unwrap_err();
        match err {
            ExtractError::Column { kind, signal, .. } => {
                assert_eq!(kind, WorkbookKind::Markers);
                assert_eq!(signal, "pelvis marker");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
