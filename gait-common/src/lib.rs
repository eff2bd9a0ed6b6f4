//! # Gait Common Library
//!
//! Shared code for the gait analysis tools including:
//! - Domain value types (activities, body sides, trial signals and results)
//! - Fixed collection layout (folder naming, spreadsheet column table, report labels)
//! - Configuration loading and root folder resolution
//! - Common error type

pub mod config;
pub mod error;
pub mod layout;
pub mod types;

pub use error::{Error, Result};
pub use types::{Activity, GroupAverage, JointAngles, Side, TrialResult, TrialSignals};
