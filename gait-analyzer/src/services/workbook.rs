//! Workbook column reader
//!
//! Loads every worksheet of a spreadsheet into memory and serves numeric
//! columns by Excel letter. The first populated cell of a column is its
//! header and is skipped; the remaining populated cells are returned in row
//! order.

use calamine::{open_workbook_auto, Data, Range, Reader};
use gait_common::layout::column_index;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors opening or decoding a workbook file
///
/// These are I/O level failures and abort the run.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// File could not be opened or is not a readable spreadsheet
    #[error("Failed to open workbook {0}: {1}")]
    Open(PathBuf, String),

    /// A worksheet listed by the workbook could not be decoded
    #[error("Failed to read sheet '{1}' in {0}: {2}")]
    Sheet(PathBuf, String, String),
}

/// Errors reading one column
///
/// These are trial-local: the affected trial is skipped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ColumnError {
    /// No worksheet with this name
    #[error("Sheet not found: '{0}'")]
    SheetNotFound(String),

    /// Column identifier is not a valid Excel column
    #[error("Invalid column identifier: '{0}'")]
    InvalidColumn(String),

    /// Column lies outside the sheet's used range or holds no populated cell
    #[error("Column {column} not found in sheet '{sheet}'")]
    ColumnNotFound { sheet: String, column: String },

    /// A populated data cell is not a finite number
    #[error("Non-numeric value '{value}' at {column}{row} in sheet '{sheet}'")]
    NonNumeric {
        sheet: String,
        column: String,
        /// 1-based spreadsheet row
        row: u32,
        value: String,
    },
}

/// Source of named numeric columns grouped into sheets
pub trait ColumnSource {
    /// Short name for log messages (usually the file name)
    fn label(&self) -> &str;

    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<&str>;

    /// Read a column's data cells (header skipped) as numbers
    fn read_column(&self, sheet: &str, column: &str) -> Result<Vec<f64>, ColumnError>;

    /// First sheet, in workbook order, whose name contains the trial number
    fn sheet_for_trial(&self, trial: u32) -> Option<&str> {
        let needle = trial.to_string();
        self.sheet_names()
            .into_iter()
            .find(|name| name.contains(&needle))
    }
}

/// One loaded worksheet
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub cells: Range<Data>,
}

/// Spreadsheet held fully in memory
#[derive(Debug, Clone)]
pub struct Workbook {
    label: String,
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Open a workbook and load all of its worksheets
    pub fn open(path: &Path) -> Result<Self, WorkbookError> {
        let mut reader = open_workbook_auto(path)
            .map_err(|e| WorkbookError::Open(path.to_path_buf(), e.to_string()))?;

        let names = reader.sheet_names();
        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let cells = reader.worksheet_range(&name).map_err(|e| {
                WorkbookError::Sheet(path.to_path_buf(), name.clone(), e.to_string())
            })?;
            sheets.push(Sheet { name, cells });
        }

        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        debug!("Loaded {} sheets from {}", sheets.len(), path.display());

        Ok(Self { label, sheets })
    }

    /// Build a workbook from already decoded sheets
    pub fn from_sheets(label: impl Into<String>, sheets: Vec<Sheet>) -> Self {
        Self {
            label: label.into(),
            sheets,
        }
    }

    fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

impl ColumnSource for Workbook {
    fn label(&self) -> &str {
        &self.label
    }

    fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    fn read_column(&self, sheet: &str, column: &str) -> Result<Vec<f64>, ColumnError> {
        let sheet_ref = self
            .sheet(sheet)
            .ok_or_else(|| ColumnError::SheetNotFound(sheet.to_string()))?;
        let col = column_index(column).ok_or_else(|| ColumnError::InvalidColumn(column.to_string()))?;

        let populated = populated_cells(&sheet_ref.cells, col);
        if populated.is_empty() {
            return Err(ColumnError::ColumnNotFound {
                sheet: sheet.to_string(),
                column: column.to_string(),
            });
        }

        populated
            .into_iter()
            .skip(1)
            .map(|(row, cell)| {
                cell_to_f64(cell).ok_or_else(|| ColumnError::NonNumeric {
                    sheet: sheet.to_string(),
                    column: column.to_string(),
                    row: row + 1,
                    value: cell.to_string(),
                })
            })
            .collect()
    }
}

/// Populated cells of one column as (0-based row, cell)
fn populated_cells(range: &Range<Data>, col: u32) -> Vec<(u32, &Data)> {
    let (Some((start_row, start_col)), Some((end_row, end_col))) = (range.start(), range.end())
    else {
        return Vec::new();
    };

    if col < start_col || col > end_col {
        return Vec::new();
    }

    (start_row..=end_row)
        .filter_map(|row| range.get_value((row, col)).map(|cell| (row, cell)))
        .filter(|(_, cell)| is_populated(cell))
        .collect()
}

fn is_populated(cell: &Data) -> bool {
    match cell {
        Data::Empty => false,
        Data::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn cell_to_f64(cell: &Data) -> Option<f64> {
    let value = match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::String(s) => parse_numeric_text(s)?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Parse numeric text, accepting a decimal comma (`12,5`)
pub fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .or_else(|| trimmed.replace(',', ".").parse::<f64>().ok())
}
