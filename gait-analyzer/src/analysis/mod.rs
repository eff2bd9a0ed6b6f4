//! Segmentation and aggregation engine

pub mod aggregation;
pub mod segmentation;

pub use aggregation::group_averages;
pub use segmentation::{analyze_trial, AnalysisWindow, CutPoints, SkipReason, TrialAnalysis};
