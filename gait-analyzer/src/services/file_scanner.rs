//! Collection folder scanner
//!
//! Locates each day's markers and kinematics workbooks by naming convention:
//!
//! ```text
//! <root>/Dia_<d>_Cinematica/<ACTIVITY>/*_Direita.xlsx
//! <root>/Dia_<d>_Marcadores/<ACTIVITY>/*_Esquerda.xlsx
//! ```
//!
//! Missing folders are reported and skipped, never fatal.

use crate::services::trial_extractor::WorkbookKind;
use gait_common::layout::{
    kinematics_day_folder, markers_day_folder, side_file_suffix, WORKBOOK_EXTENSION,
};
use gait_common::{Activity, Side};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Folder scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Workbook pair for one activity and side
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideWorkbooks {
    pub markers: Option<PathBuf>,
    pub kinematics: Option<PathBuf>,
}

impl SideWorkbooks {
    /// Both workbooks, when present
    pub fn pair(&self) -> Option<(&Path, &Path)> {
        match (&self.markers, &self.kinematics) {
            (Some(m), Some(k)) => Some((m.as_path(), k.as_path())),
            _ => None,
        }
    }

    fn set(&mut self, kind: WorkbookKind, path: PathBuf) {
        let slot = match kind {
            WorkbookKind::Markers => &mut self.markers,
            WorkbookKind::Kinematics => &mut self.kinematics,
        };
        if slot.is_none() {
            *slot = Some(path);
        }
    }
}

/// Workbooks found for one collection day
#[derive(Debug, Clone, Default)]
pub struct DayFiles {
    pub day: u32,
    workbooks: HashMap<(Activity, Side), SideWorkbooks>,
    /// Expected folders that do not exist
    pub missing_folders: Vec<PathBuf>,
}

impl DayFiles {
    /// Workbooks for an activity and side (empty when none were found)
    pub fn workbooks(&self, activity: Activity, side: Side) -> SideWorkbooks {
        self.workbooks
            .get(&(activity, side))
            .cloned()
            .unwrap_or_default()
    }
}

/// Collection folder scanner
pub struct DataFolderScanner {
    ignore_prefixes: Vec<String>,
}

impl DataFolderScanner {
    /// Create new scanner with default ignore patterns
    ///
    /// Ignores Excel lock files (`~$...`) and hidden files.
    pub fn new() -> Self {
        Self {
            ignore_prefixes: vec!["~$".to_string(), ".".to_string()],
        }
    }

    /// Locate one day's workbooks under the root folder
    pub fn scan_day(&self, root: &Path, day: u32) -> Result<DayFiles, ScanError> {
        if !root.exists() {
            return Err(ScanError::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut files = DayFiles {
            day,
            ..DayFiles::default()
        };

        let day_folders = [
            (kinematics_day_folder(day), WorkbookKind::Kinematics),
            (markers_day_folder(day), WorkbookKind::Markers),
        ];

        for (folder_name, kind) in day_folders {
            let day_folder = root.join(folder_name);
            if !day_folder.is_dir() {
                warn!("Folder not found: {}", day_folder.display());
                files.missing_folders.push(day_folder);
                continue;
            }
            info!("Exploring: {}", day_folder.display());

            for activity in Activity::ALL {
                let activity_folder = day_folder.join(activity.label());
                if !activity_folder.is_dir() {
                    warn!(
                        "Subfolder not found for {}: {}",
                        activity,
                        activity_folder.display()
                    );
                    files.missing_folders.push(activity_folder);
                    continue;
                }
                info!("Found {} subfolder: {}", activity, activity_folder.display());

                for side in Side::ALL {
                    let candidates = self.side_workbooks(&activity_folder, side);
                    if candidates.len() > 1 {
                        debug!(
                            "{} {} workbooks for {} {}; using {}",
                            candidates.len(),
                            kind.label(),
                            activity,
                            side,
                            candidates[0].display()
                        );
                    }
                    if let Some(first) = candidates.into_iter().next() {
                        files
                            .workbooks
                            .entry((activity, side))
                            .or_default()
                            .set(kind, first);
                    }
                }
            }
        }

        Ok(files)
    }

    /// Workbooks for a side directly inside a folder, in file-name order
    fn side_workbooks(&self, folder: &Path, side: Side) -> Vec<PathBuf> {
        let suffix = side_file_suffix(side);

        WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Error accessing entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| !self.is_ignored(&entry.file_name().to_string_lossy()))
            .map(|entry| entry.into_path())
            .filter(|path| is_side_workbook(path, &suffix))
            .collect()
    }

    fn is_ignored(&self, file_name: &str) -> bool {
        self.ignore_prefixes
            .iter()
            .any(|prefix| file_name.starts_with(prefix.as_str()))
    }
}

impl Default for DataFolderScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// `*<suffix>.xlsx`, extension compared case-insensitively
fn is_side_workbook(path: &Path, suffix: &str) -> bool {
    let has_extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(WORKBOOK_EXTENSION))
        .unwrap_or(false);
    let has_suffix = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().ends_with(suffix))
        .unwrap_or(false);
    has_extension && has_suffix
}
