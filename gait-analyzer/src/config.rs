//! Resolved run settings
//!
//! Built once in `main` from the TOML file and CLI overrides; the workflow
//! never reads configuration sources directly.

use gait_common::config::{
    OutputFormat, TomlConfig, DEFAULT_DAY_COUNT, DEFAULT_FIRST_DAY, DEFAULT_TRIALS_PER_SIDE,
};
use std::path::PathBuf;

/// Settings of one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    /// Collection root folder (validated)
    pub root_folder: PathBuf,
    /// Folder receiving the reports
    pub output_folder: PathBuf,
    pub first_day: u32,
    pub day_count: u32,
    pub trials_per_side: u32,
    pub output_format: OutputFormat,
}

impl AnalysisSettings {
    /// Defaults for a root folder; reports go into the root folder
    pub fn new(root_folder: impl Into<PathBuf>) -> Self {
        let root_folder = root_folder.into();
        Self {
            output_folder: root_folder.clone(),
            root_folder,
            first_day: DEFAULT_FIRST_DAY,
            day_count: DEFAULT_DAY_COUNT,
            trials_per_side: DEFAULT_TRIALS_PER_SIDE,
            output_format: OutputFormat::default(),
        }
    }

    /// Settings from a loaded TOML config
    pub fn from_config(root_folder: impl Into<PathBuf>, config: &TomlConfig) -> Self {
        let root_folder = root_folder.into();
        Self {
            output_folder: config
                .output_folder
                .clone()
                .unwrap_or_else(|| root_folder.clone()),
            root_folder,
            first_day: config.first_day,
            day_count: config.day_count,
            trials_per_side: config.trials_per_side,
            output_format: config.output_format,
        }
    }

    /// Collection days processed, in order
    pub fn days(&self) -> impl Iterator<Item = u32> {
        let first = self.first_day;
        (0..self.day_count).map(move |offset| first.saturating_add(offset))
    }
}
