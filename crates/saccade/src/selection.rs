//! Typed event payloads and the upstream inputs they feed.
//!
//! Panels never read a shared "current selection"; every render gets the
//! latest payload of each input it declared and rebuilds its view of the
//! selection from those.

use crate::config::DefaultSelection;
use crate::measure::Measure;
use crate::observation::Level;
use crate::table::{Predicate, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a point on the overview chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClickIdentity {
    pub participant: String,
    /// Category used for coloring
    pub task: String,
    pub group: String,
}

/// Identity of a point on the participant chart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct TrialIdentity {
    pub trial: i64,
}

/// Positions, in the participant panel's trial ordering, of the points
/// inside one histogram bin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoverBin {
    pub point_indices: Vec<usize>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
pub enum InputId {
    Measure,
    OverviewClick,
    ParticipantClick,
    HistogramHover,
}

impl InputId {
    pub const ALL: [InputId; 4] = [
        InputId::Measure,
        InputId::OverviewClick,
        InputId::ParticipantClick,
        InputId::HistogramHover,
    ];
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputId::Measure => "measure",
            InputId::OverviewClick => "overview-click",
            InputId::ParticipantClick => "participant-click",
            InputId::HistogramHover => "histogram-hover",
        };
        f.write_str(name)
    }
}

/// A user interaction, already decoded from the renderer's payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    MeasureSelected(Measure),
    OverviewClicked(ClickIdentity),
    ParticipantClicked(TrialIdentity),
    HistogramHovered(Option<HoverBin>),
}

impl Event {
    pub fn input(&self) -> InputId {
        match self {
            Event::MeasureSelected(_) => InputId::Measure,
            Event::OverviewClicked(_) => InputId::OverviewClick,
            Event::ParticipantClicked(_) => InputId::ParticipantClick,
            Event::HistogramHovered(_) => InputId::HistogramHover,
        }
    }
}

/// Latest payload of every input.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub measure: Measure,
    pub overview_click: ClickIdentity,
    pub participant_click: TrialIdentity,
    pub histogram_hover: Option<HoverBin>,
}

impl Inputs {
    /// Inputs before any interaction. Every click input gets a value so
    /// that the first render of every panel succeeds.
    pub fn seeded(
        table: &Table,
        measure: Measure,
        defaults: &DefaultSelection,
    ) -> Self {
        let overview_click = default_click(table, defaults);
        let participant_click = default_trial(
            table,
            &overview_click.participant,
            defaults.trial,
        );
        Self {
            measure,
            overview_click,
            participant_click,
            histogram_hover: None,
        }
    }

    /// Store the event's payload. Returns false when nothing changed.
    pub fn apply(&mut self, event: Event) -> bool {
        fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        }
        match event {
            Event::MeasureSelected(m) => replace(&mut self.measure, m),
            Event::OverviewClicked(c) => {
                replace(&mut self.overview_click, c)
            }
            Event::ParticipantClicked(t) => {
                replace(&mut self.participant_click, t)
            }
            Event::HistogramHovered(h) => {
                replace(&mut self.histogram_hover, h)
            }
        }
    }
}

/// The configured participant if it has an aggregate row, else the first
/// participant aggregate, else the configured name as given.
pub fn default_click(
    table: &Table,
    defaults: &DefaultSelection,
) -> ClickIdentity {
    let aggregates = table.filter(&[Predicate::level(Level::Participant)]);
    let preferred = aggregates
        .filter(&[Predicate::participant(&defaults.participant)]);
    match preferred.get(0).or_else(|| aggregates.get(0)) {
        Some(row) => ClickIdentity {
            participant: row.participant.clone(),
            task: row.task.clone(),
            group: row.group.clone(),
        },
        None => ClickIdentity {
            participant: defaults.participant.clone(),
            task: defaults.task.clone(),
            group: String::new(),
        },
    }
}

/// `preferred` if the participant has that trial, else the participant's
/// first trial aggregate, else `preferred` unchanged.
pub fn default_trial(
    table: &Table,
    participant: &str,
    preferred: i64,
) -> TrialIdentity {
    let trials = table.filter(&[
        Predicate::participant(participant),
        Predicate::level(Level::Trial),
    ]);
    let has_preferred = trials.rows().any(|r| r.trial == Some(preferred));
    let trial = if has_preferred {
        preferred
    } else {
        trials.rows().find_map(|r| r.trial).unwrap_or(preferred)
    };
    TrialIdentity { trial }
}
