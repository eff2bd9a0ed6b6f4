//! Processing context passed explicitly through the run

use gait_common::{Activity, Side};
use std::fmt;

/// The unit of work being processed: one activity, one side, one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunContext {
    pub day: u32,
    pub activity: Activity,
    pub side: Side,
}

impl RunContext {
    pub fn new(day: u32, activity: Activity, side: Side) -> Self {
        Self {
            day,
            activity,
            side,
        }
    }
}

impl fmt::Display for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dia {} / {} / {}", self.day, self.activity, self.side)
    }
}
