//! gait-analyzer library interface
//!
//! Extracts windowed joint-angle maxima from paired markers and kinematics
//! workbooks, averages them per `(activity, day, side)` and writes one report
//! per activity. Exposed as a library for integration testing.

pub mod analysis;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod services;
pub mod workflow;

pub use crate::config::AnalysisSettings;
pub use crate::context::RunContext;
pub use crate::error::{AnalyzerError, AnalyzerResult};
pub use crate::workflow::{AnalysisRun, RunReport, RunStatistics};
