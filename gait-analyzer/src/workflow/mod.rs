//! Run orchestration and statistics

pub mod orchestrator;
pub mod statistics;

pub use orchestrator::{analyze_side, AnalysisRun, RunReport};
pub use statistics::{RunStatistics, SkipCounts};
