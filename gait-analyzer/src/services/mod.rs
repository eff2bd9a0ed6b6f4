//! Input services: folder scanning, workbook reading and trial extraction

pub mod file_scanner;
pub mod trial_extractor;
pub mod workbook;

pub use file_scanner::{DataFolderScanner, DayFiles, ScanError, SideWorkbooks};
pub use trial_extractor::{extract_trial, ExtractError, WorkbookKind};
pub use workbook::{ColumnError, ColumnSource, Workbook, WorkbookError};
