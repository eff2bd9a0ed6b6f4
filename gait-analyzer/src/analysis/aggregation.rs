//! Group averages of trial maxima
//!
//! Trials sharing `(activity, day, side)` form a group; each group is reduced
//! to the arithmetic mean of its four maxima. Output order is day, then side
//! (Right before Left), then activity.

use gait_common::{Activity, GroupAverage, JointAngles, Side, TrialResult};
use std::collections::BTreeMap;

/// Ordering key of a group; field order defines the output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey {
    day: u32,
    side: Side,
    activity: Activity,
}

impl From<&TrialResult> for GroupKey {
    fn from(result: &TrialResult) -> Self {
        Self {
            day: result.day,
            side: result.side,
            activity: result.activity,
        }
    }
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    sums: JointAngles,
}

impl Accumulator {
    fn add(&mut self, maxima: &JointAngles) {
        self.count += 1;
        self.sums.hip_adduction += maxima.hip_adduction;
        self.sums.hip_flexion += maxima.hip_flexion;
        self.sums.hip_internal_rotation += maxima.hip_internal_rotation;
        self.sums.knee_flexion += maxima.knee_flexion;
    }

    fn means(&self) -> JointAngles {
        let n = self.count as f64;
        JointAngles {
            hip_adduction: self.sums.hip_adduction / n,
            hip_flexion: self.sums.hip_flexion / n,
            hip_internal_rotation: self.sums.hip_internal_rotation / n,
            knee_flexion: self.sums.knee_flexion / n,
        }
    }
}

/// Reduce trial results into one average per observed group
///
/// Only keys present in `results` produce an entry, so every average has
/// at least one contributing trial.
pub fn group_averages(results: &[TrialResult]) -> Vec<GroupAverage> {
    let mut groups: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();
    for result in results {
        groups
            .entry(GroupKey::from(result))
            .or_default()
            .add(&result.maxima);
    }

    groups
        .into_iter()
        .map(|(key, acc)| GroupAverage {
            activity: key.activity,
            day: key.day,
            side: key.side,
            trial_count: acc.count,
            means: acc.means(),
        })
        .collect()
}
