//! Fixed collection layout
//!
//! Folder and file naming conventions of a collection root, the spreadsheet
//! column table per body side, and the labels used in result reports.
//! These values come from the capture setup and are data, not policy.

use crate::types::{Activity, Side};

/// Kinematics folder for a collection day (e.g. `Dia_1_Cinematica`)
pub fn kinematics_day_folder(day: u32) -> String {
    format!("Dia_{}_Cinematica", day)
}

/// Markers folder for a collection day (e.g. `Dia_1_Marcadores`)
pub fn markers_day_folder(day: u32) -> String {
    format!("Dia_{}_Marcadores", day)
}

/// Workbook extension accepted by the scanner
pub const WORKBOOK_EXTENSION: &str = "xlsx";

/// File name suffix (before the extension) of a side's workbook, e.g. `_Direita`
pub fn side_file_suffix(side: Side) -> String {
    format!("_{}", side.label())
}

/// Spreadsheet columns holding one side's signals
///
/// Marker columns live in the markers workbook, angle columns in the
/// kinematics workbook. Column identifiers are Excel letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub heel_marker: &'static str,
    pub pelvis_marker: &'static str,
    pub hip_flexion: &'static str,
    pub hip_adduction: &'static str,
    pub hip_internal_rotation: &'static str,
    pub knee_flexion: &'static str,
}

pub const RIGHT_COLUMNS: ColumnLayout = ColumnLayout {
    heel_marker: "BI",
    pelvis_marker: "BL",
    hip_flexion: "H",
    hip_adduction: "I",
    hip_internal_rotation: "J",
    knee_flexion: "K",
};

pub const LEFT_COLUMNS: ColumnLayout = ColumnLayout {
    heel_marker: "AZ",
    pelvis_marker: "BO",
    hip_flexion: "O",
    hip_adduction: "P",
    hip_internal_rotation: "Q",
    knee_flexion: "R",
};

impl ColumnLayout {
    /// Column table for a body side
    pub fn for_side(side: Side) -> &'static ColumnLayout {
        match side {
            Side::Right => &RIGHT_COLUMNS,
            Side::Left => &LEFT_COLUMNS,
        }
    }
}

/// Convert Excel column letters to a zero-based column index
///
/// `A` -> 0, `Z` -> 25, `AA` -> 26, `BI` -> 60. Returns `None` for an empty
/// identifier or any character outside `A-Z` (case-insensitive).
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }

    let mut index: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }

    Some(index - 1)
}

/// Report header row, in column order
pub const REPORT_HEADERS: [&str; 7] = [
    "Arquivo",
    "Lado",
    "Dia",
    "Adução Quadril Máx.",
    "Flexão Quadril Máx.",
    "Flexão Joelho Máx.",
    "Rotação Medial Quadril Máx.",
];

/// Worksheet name of a result report
pub const REPORT_SHEET_NAME: &str = "Resultados";

/// File stem of an activity's report (e.g. `SLDL_Resultados`)
pub fn report_file_stem(activity: Activity) -> String {
    format!("{}_Resultados", activity.label())
}

/// Label of a per-trial report row (e.g. `SLDL - Tentativa 3`)
pub fn trial_row_label(activity: Activity, trial: u32) -> String {
    format!("{} - Tentativa {}", activity.label(), trial)
}

/// Label of a group-average report row (e.g. `Média - SLDL`)
pub fn average_row_label(activity: Activity) -> String {
    format!("Média - {}", activity.label())
}

/// Day cell of a report row (e.g. `Dia 2`)
pub fn day_label(day: u32) -> String {
    format!("Dia {}", day)
}
