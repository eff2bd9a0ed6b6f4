//! Error types for gait-analyzer
//!
//! Only failures that end a run live here. Trial-local conditions are
//! [`crate::analysis::SkipReason`] and [`crate::services::ExtractError`],
//! which are counted and skipped instead.

use crate::export::ExportError;
use crate::services::{ScanError, WorkbookError};
use thiserror::Error;

/// Run-level error type
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Root folder could not be scanned
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Workbook could not be opened or decoded
    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    /// Report could not be written
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// gait-common error
    #[error("Common error: {0}")]
    Common(#[from] gait_common::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Summary serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AnalyzerResult<T> = std::result::Result<T, AnalyzerError>;
