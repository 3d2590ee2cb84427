use serde::{Deserialize, Serialize};
use std::fmt;

// ------------------------------------------------------------------
// Column names
// ------------------------------------------------------------------

pub const TASK: &str = "Task";
pub const GROUP: &str = "Group";
pub const PARTICIPANT: &str = "Participant";
pub const TRIAL: &str = "Trial";
pub const SACCADE: &str = "Saccade";
pub const LEVEL: &str = "Level";

pub const AMPLITUDE: &str = "Amplitude";
pub const PEAK_VELOCITY: &str = "Peak Velocity";
pub const LATENCY: &str = "Latency";
pub const PIXEL_DISTANCE: &str = "Pixel Distance";
pub const DEGREE_DISTANCE: &str = "Degree Distance";
pub const SACCADE_X: &str = "Saccade-X";
pub const SACCADE_Y: &str = "Saccade-Y";
pub const TARGET_X: &str = "Target-X";
pub const TARGET_Y: &str = "Target-Y";

// ------------------------------------------------------------------
// Row granularity
// ------------------------------------------------------------------

/// Granularity of a row: participant aggregate, trial aggregate or a
/// single saccade.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub enum Level {
    #[serde(rename = "P")]
    Participant,
    #[serde(rename = "T")]
    Trial,
    #[serde(rename = "S")]
    Saccade,
}

impl Level {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "P" => Some(Level::Participant),
            "T" => Some(Level::Trial),
            "S" => Some(Level::Saccade),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Participant => "P",
            Level::Trial => "T",
            Level::Saccade => "S",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ------------------------------------------------------------------
// Observation
// ------------------------------------------------------------------

/// One row of the dataset.
///
/// Numeric measures live in `numeric`, addressed by the column index the
/// owning [`Table`](crate::Table) assigns to each numeric header.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub task: String,
    pub group: String,
    pub participant: String,
    /// Absent on participant aggregates
    pub trial: Option<i64>,
    /// Absent on participant and trial aggregates
    pub saccade: Option<i64>,
    pub level: Level,
    pub(crate) numeric: Vec<f64>,
}

impl Observation {
    /// Numeric value at a column index; `NaN` when the cell was empty.
    pub fn numeric(&self, column_idx: usize) -> f64 {
        self.numeric.get(column_idx).copied().unwrap_or(f64::NAN)
    }
}
