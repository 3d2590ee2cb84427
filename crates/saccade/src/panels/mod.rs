//! The chart panels. Each one is a pure function of the table, the current
//! inputs and the configuration.

pub mod histogram;
pub mod overview;
pub mod participant;
pub mod pixel;
pub mod trial;

#[cfg(test)]
pub(crate) mod fixtures;

pub use histogram::HistogramPanel;
pub use overview::OverviewPanel;
pub use participant::ParticipantPanel;
pub use pixel::PixelSpacePanel;
pub use trial::TrialPanel;

use crate::chart::{ChartSpec, Marker, MarkerShape};
use crate::color::Rgb;
use crate::config::DashboardConfig;
use crate::measure::Measure;
use crate::observation::{AMPLITUDE, Level};
use crate::selection::{InputId, Inputs};
use crate::table::{Column, Op, Predicate, Selection, Table};
use serde::Serialize;
use std::fmt;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    #[error("measure \"{0}\" has no column in the dataset")]
    UnknownMeasure(Measure),
    #[error("dataset has no \"{0}\" column")]
    MissingColumn(&'static str),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub enum PanelId {
    Overview,
    Participant,
    Histogram,
    Trial,
    PixelSpace,
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PanelId::Overview => "all-data-scatter",
            PanelId::Participant => "participant-scatter",
            PanelId::Histogram => "participant-histogram",
            PanelId::Trial => "trial-scatter",
            PanelId::PixelSpace => "pixel-space",
        };
        f.write_str(name)
    }
}

/// What a panel reads while rendering.
#[derive(Clone, Copy)]
pub struct PanelContext<'a> {
    pub table: &'a Table,
    pub inputs: &'a Inputs,
    pub config: &'a DashboardConfig,
}

pub trait Panel {
    fn id(&self) -> PanelId;

    /// Inputs whose change makes this panel re-render.
    fn inputs(&self) -> &'static [InputId];

    /// The input this panel's click or hover events feed.
    fn emits(&self) -> Option<InputId> {
        None
    }

    fn render(&self, ctx: &PanelContext<'_>) -> Result<ChartSpec, PanelError>;
}

/// Every panel of the dashboard.
pub fn all() -> Vec<Box<dyn Panel>> {
    vec![
        Box::new(OverviewPanel),
        Box::new(ParticipantPanel),
        Box::new(HistogramPanel),
        Box::new(TrialPanel),
        Box::new(PixelSpacePanel),
    ]
}

// ------------------------------------------------------------------
// Shared helpers
// ------------------------------------------------------------------

fn measure_column(
    table: &Table,
    measure: &Measure,
) -> Result<usize, PanelError> {
    table
        .column_index(measure.name())
        .ok_or_else(|| PanelError::UnknownMeasure(measure.clone()))
}

fn required_column(
    table: &Table,
    name: &'static str,
) -> Result<usize, PanelError> {
    table
        .column_index(name)
        .ok_or(PanelError::MissingColumn(name))
}

/// Trial aggregates of one participant, in table order. The participant
/// and histogram panels both index into this ordering.
pub fn trial_rows<'a>(table: &'a Table, participant: &str) -> Selection<'a> {
    table.filter(&[
        Predicate::participant(participant),
        Predicate::level(Level::Trial),
        // rows without a trial number cannot be plotted or clicked
        Predicate::new(Column::Trial, Op::Ge, i64::MIN),
    ])
}

/// Single saccades of one trial, in table order.
pub fn saccade_rows<'a>(
    table: &'a Table,
    participant: &str,
    trial: i64,
) -> Selection<'a> {
    table.filter(&[
        Predicate::participant(participant),
        Predicate::trial(trial),
        Predicate::level(Level::Saccade),
        Predicate::new(Column::Saccade, Op::Ge, i64::MIN),
    ])
}

/// Position within `saccades` of the row with the largest amplitude. The
/// first maximum in row order wins; `NaN` amplitudes are skipped.
pub fn max_amplitude_position(
    saccades: &Selection<'_>,
) -> Result<Option<usize>, PanelError> {
    let amplitude = required_column(saccades.table(), AMPLITUDE)?;
    let mut best: Option<(usize, f64)> = None;
    for (pos, row) in saccades.rows().enumerate() {
        let v = row.numeric(amplitude);
        if v.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((pos, v));
        }
    }
    Ok(best.map(|(pos, _)| pos))
}

/// Color of the clicked participant's category. An unmapped category gets
/// the fallback color and a notice on the chart.
fn category_color(ctx: &PanelContext<'_>, chart: &mut ChartSpec) -> Rgb {
    color_for(ctx.config, &ctx.inputs.overview_click.task, chart)
}

fn color_for(
    config: &DashboardConfig,
    category: &str,
    chart: &mut ChartSpec,
) -> Rgb {
    let (color, err) = config.category_colors.resolve(category);
    if let Some(e) = err {
        let message = e.to_string();
        if !chart.notices.contains(&message) {
            chart.notice(message);
        }
    }
    color
}

fn plain_marker(config: &DashboardConfig) -> Marker {
    Marker {
        size: config.marker_size,
        opacity: config.opacity,
        shape: MarkerShape::Circle,
    }
}

fn emphasis_marker(config: &DashboardConfig) -> Marker {
    Marker {
        size: config.marker_size * 1.4,
        opacity: 1.0,
        shape: MarkerShape::Circle,
    }
}

fn max_marker(config: &DashboardConfig) -> Marker {
    Marker {
        size: config.marker_size * 1.2,
        opacity: 1.0,
        shape: MarkerShape::Diamond,
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn max_amplitude_prefers_first_of_equal_values() {
        let table = scenario_table();
        let saccades = saccade_rows(&table, "gapBL401ak", 2);
        assert_eq!(saccades.len(), 4);
        assert_eq!(max_amplitude_position(&saccades), Ok(Some(1)));

        let tied = table_from_amplitudes(&[2.0, 5.0, 5.0, f64::NAN]);
        let saccades = saccade_rows(&tied, "p0", 1);
        assert_eq!(max_amplitude_position(&saccades), Ok(Some(1)));
    }

    #[test]
    fn max_amplitude_of_empty_trial_is_none() {
        let table = scenario_table();
        let saccades = saccade_rows(&table, "gapBL401ak", 99);
        assert_eq!(max_amplitude_position(&saccades), Ok(None));
    }

    #[test]
    fn max_amplitude_requires_amplitude_column() {
        let csv = "Task,Group,Participant,Trial,Saccade,Latency,Level\n\
                   GAP,BL,p,1,0,1.0,S\n";
        let table = Table::from_reader(csv.as_bytes()).unwrap();
        let saccades = saccade_rows(&table, "p", 1);
        assert_eq!(
            max_amplitude_position(&saccades),
            Err(PanelError::MissingColumn("Amplitude"))
        );
    }

    #[test]
    fn every_panel_renders_on_default_inputs() {
        let table = scenario_table();
        let config = DashboardConfig::default();
        let inputs = default_inputs(&table, &config);
        let ctx = PanelContext {
            table: &table,
            inputs: &inputs,
            config: &config,
        };
        for panel in all() {
            assert!(panel.render(&ctx).is_ok(), "{} failed", panel.id());
        }
    }

    proptest! {
        #[test]
        fn renders_are_idempotent(
            table in arb_table(),
            measure_idx in 0usize..5,
            hover in proptest::collection::vec(0usize..8, 0..4),
        ) {
            let config = DashboardConfig::default();
            let mut inputs = default_inputs(&table, &config);
            inputs.measure =
                config.measures.iter().nth(measure_idx).unwrap().clone();
            inputs.histogram_hover = Some(crate::selection::HoverBin {
                point_indices: hover,
            });
            let ctx = PanelContext {
                table: &table,
                inputs: &inputs,
                config: &config,
            };
            for panel in all() {
                prop_assert_eq!(panel.render(&ctx), panel.render(&ctx));
            }
        }

        #[test]
        fn max_amplitude_matches_scan(
            amplitudes in proptest::collection::vec(-100.0f64..100.0, 1..12),
        ) {
            let table = table_from_amplitudes(&amplitudes);
            let saccades = saccade_rows(&table, "p0", 1);
            let pos = max_amplitude_position(&saccades).unwrap().unwrap();
            let max =
                amplitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(amplitudes[pos], max);
            prop_assert!(amplitudes[..pos].iter().all(|&a| a < max));
        }
    }
}
