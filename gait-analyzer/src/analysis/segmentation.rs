//! Trial segmentation and windowed maxima
//!
//! A trial's analysis window is bounded by two cut points found on the
//! marker trajectories:
//!
//! 1. **Heel peak**: first index of the heel marker's maximum.
//! 2. **Heel return**: first index after the peak, scanning `1..len-1`
//!    (the last sample is never examined), where the heel marker is back at
//!    or below its first sample.
//! 3. **Pelvis trough**: first index of the pelvis marker's minimum strictly
//!    after the heel peak, in the pelvis marker's own index space.
//!
//! The window is `[heel return, pelvis trough]` inclusive, with a missing
//! heel return collapsing the start to 0. A window whose end does not lie
//! after its start drops the trial. Every joint angle is then reduced to
//! its maximum inside the window.
//!
//! All failures here are trial-local and reported as [`SkipReason`].

use gait_common::{JointAngles, TrialResult, TrialSignals};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Closed sample-index range `[start, end]` with `start < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisWindow {
    start: usize,
    end: usize,
}

impl AnalysisWindow {
    /// Build a window; `None` unless `end > start`
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of samples covered
    pub fn sample_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Indices located on the marker trajectories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CutPoints {
    pub heel_peak: usize,
    /// `None` when the heel never returns to baseline after the peak
    pub heel_return: Option<usize>,
    pub pelvis_trough: usize,
}

/// Why a trial produced no result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("heel marker series is empty")]
    EmptyHeelMarker,

    #[error("no pelvis samples after heel peak at index {heel_peak}")]
    NoPelvisAfterPeak { heel_peak: usize },

    #[error("invalid analysis window [{start}, {end}]")]
    InvalidWindow { start: usize, end: usize },

    /// A non-empty joint-angle series ends before the window starts
    #[error("{signal} has {len} samples, window starts at {start}")]
    WindowBeyondSeries {
        signal: &'static str,
        len: usize,
        start: usize,
    },
}

/// Outcome of one analyzed trial
#[derive(Debug, Clone, PartialEq)]
pub struct TrialAnalysis {
    pub cut_points: CutPoints,
    pub window: AnalysisWindow,
    pub result: TrialResult,
}

/// Index of the first occurrence of the maximum
pub fn first_max_index(series: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &value) in series.iter().enumerate() {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the first occurrence of the minimum
pub fn first_min_index(series: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &value) in series.iter().enumerate() {
        match best {
            Some((_, current)) if value >= current => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// Heel peak: first index of the heel marker's maximum
pub fn heel_peak_index(heel: &[f64]) -> Result<usize, SkipReason> {
    first_max_index(heel).ok_or(SkipReason::EmptyHeelMarker)
}

/// First index `k` in `1..len-1` with `k > peak` and `heel[k] <= heel[0]`
pub fn heel_return_index(heel: &[f64], heel_peak: usize) -> Option<usize> {
    let baseline = *heel.first()?;
    let last = heel.len().checked_sub(1)?;

    (1..last).find(|&k| k > heel_peak && heel[k] <= baseline)
}

/// First index of the pelvis minimum strictly after the heel peak
pub fn pelvis_trough_index(pelvis: &[f64], heel_peak: usize) -> Result<usize, SkipReason> {
    let from = heel_peak + 1;
    let tail = pelvis.get(from..).unwrap_or(&[]);

    first_min_index(tail)
        .map(|offset| from + offset)
        .ok_or(SkipReason::NoPelvisAfterPeak { heel_peak })
}

/// Locate all cut points of a trial
pub fn find_cut_points(heel: &[f64], pelvis: &[f64]) -> Result<CutPoints, SkipReason> {
    let heel_peak = heel_peak_index(heel)?;
    let heel_return = heel_return_index(heel, heel_peak);
    let pelvis_trough = pelvis_trough_index(pelvis, heel_peak)?;

    Ok(CutPoints {
        heel_peak,
        heel_return,
        pelvis_trough,
    })
}

/// Build the analysis window from cut points
///
/// `pelvis_len` caps the end at the last pelvis sample.
pub fn analysis_window(cut: &CutPoints, pelvis_len: usize) -> Result<AnalysisWindow, SkipReason> {
    let start = cut.heel_return.unwrap_or(0);
    let end = cut.pelvis_trough.min(pelvis_len.saturating_sub(1));

    AnalysisWindow::new(start, end).ok_or(SkipReason::InvalidWindow { start, end })
}

/// Maximum over `[start, end]`, truncated to the series length
///
/// `None` when the window starts past the end of the series. An empty
/// series is handled by the caller.
pub fn windowed_max(series: &[f64], window: AnalysisWindow) -> Option<f64> {
    let end = window.end().min(series.len().checked_sub(1)?);
    let slice = series.get(window.start()..=end)?;

    slice.iter().copied().reduce(f64::max)
}

/// Windowed maximum of a joint angle; an empty series yields 0
fn angle_max(
    signal: &'static str,
    series: &[f64],
    window: AnalysisWindow,
) -> Result<f64, SkipReason> {
    if series.is_empty() {
        return Ok(0.0);
    }
    windowed_max(series, window).ok_or(SkipReason::WindowBeyondSeries {
        signal,
        len: series.len(),
        start: window.start(),
    })
}

/// Run the full segmentation on one trial
pub fn analyze_trial(signals: &TrialSignals) -> Result<TrialAnalysis, SkipReason> {
    let cut_points = find_cut_points(&signals.heel_marker, &signals.pelvis_marker)?;
    debug!(
        "Trial {}: heel peak {}, heel return {:?}, pelvis trough {}",
        signals.trial, cut_points.heel_peak, cut_points.heel_return, cut_points.pelvis_trough
    );

    let window = analysis_window(&cut_points, signals.pelvis_marker.len())?;

    let maxima = JointAngles {
        hip_adduction: angle_max("hip adduction", &signals.hip_adduction, window)?,
        hip_flexion: angle_max("hip flexion", &signals.hip_flexion, window)?,
        hip_internal_rotation: angle_max(
            "hip internal rotation",
            &signals.hip_internal_rotation,
            window,
        )?,
        knee_flexion: angle_max("knee flexion", &signals.knee_flexion, window)?,
    };

    Ok(TrialAnalysis {
        cut_points,
        window,
        result: TrialResult {
            activity: signals.activity,
            day: signals.day,
            side: signals.side,
            trial: signals.trial,
            maxima,
        },
    })
}
