//! Domain value types
//!
//! Every type here is a plain value record. The analysis engine reads
//! `TrialSignals`, produces `TrialResult`s, and the aggregator reduces those
//! into `GroupAverage`s; nothing is shared or mutated after construction.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered sequence of samples; the index is the sample number
pub type TimeSeries = Vec<f64>;

/// Movement task recorded in a collection session
///
/// SLDL and SLHFD share the same analysis. SLLV is recognized in the
/// collection layout but has no analysis yet and never yields results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Activity {
    #[serde(rename = "SLDL")]
    Sldl,
    #[serde(rename = "SLHFD")]
    Slhfd,
    #[serde(rename = "SLLV")]
    Sllv,
}

impl Activity {
    /// All activities, in processing order
    pub const ALL: [Activity; 3] = [Activity::Sldl, Activity::Slhfd, Activity::Sllv];

    /// Label used for folder names, file names and report rows
    pub fn label(&self) -> &'static str {
        match self {
            Activity::Sldl => "SLDL",
            Activity::Slhfd => "SLHFD",
            Activity::Sllv => "SLLV",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Activity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Activity::ALL
            .into_iter()
            .find(|a| a.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown activity: {}", s)))
    }
}

/// Body side of the recorded limb
///
/// Declaration order is the report order: Right sorts before Left, matching
/// the canonical labels ("Direita" < "Esquerda").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Right,
    Left,
}

impl Side {
    /// Both sides, in processing order
    pub const ALL: [Side; 2] = [Side::Right, Side::Left];

    /// Canonical label used in file names and reports
    pub fn label(&self) -> &'static str {
        match self {
            Side::Right => "Direita",
            Side::Left => "Esquerda",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "right" | "direita" | "r" | "d" => Ok(Side::Right),
            "left" | "esquerda" | "l" | "e" => Ok(Side::Left),
            other => Err(Error::InvalidInput(format!("Unknown side: {}", other))),
        }
    }
}

/// The four joint angles reported per trial (maxima) and per group (means)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointAngles {
    pub hip_adduction: f64,
    pub hip_flexion: f64,
    pub hip_internal_rotation: f64,
    pub knee_flexion: f64,
}

/// One trial's extracted signals plus its identifying metadata
#[derive(Debug, Clone, PartialEq)]
pub struct TrialSignals {
    pub activity: Activity,
    pub day: u32,
    pub side: Side,
    /// Trial number, 1-based
    pub trial: u32,

    /// Heel marker trajectory (markers workbook)
    pub heel_marker: TimeSeries,
    /// Pelvis marker trajectory (markers workbook)
    pub pelvis_marker: TimeSeries,

    /// Joint angles (kinematics workbook)
    pub hip_flexion: TimeSeries,
    pub hip_adduction: TimeSeries,
    pub hip_internal_rotation: TimeSeries,
    pub knee_flexion: TimeSeries,
}

/// Windowed maxima of one analyzed trial
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub activity: Activity,
    pub day: u32,
    pub side: Side,
    pub trial: u32,
    pub maxima: JointAngles,
}

/// Mean of the trial maxima sharing one `(activity, day, side)` key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupAverage {
    pub activity: Activity,
    pub day: u32,
    pub side: Side,
    /// Number of trials contributing to the means (always >= 1)
    pub trial_count: usize,
    pub means: JointAngles,
}
