use super::{
    Panel, PanelContext, PanelError, PanelId, category_color,
    max_amplitude_position, max_marker, measure_column, plain_marker,
    saccade_rows,
};
use crate::chart::{ChartSpec, Coord, Point, PointData, ScatterSeries};
use crate::observation::Observation;
use crate::selection::InputId;

pub const SACCADES: &str = "Saccades";
pub const MAX_AMPLITUDE: &str = "Max Amplitude";

/// Single saccades of the clicked trial, with the largest-amplitude
/// saccade drawn again on top.
pub struct TrialPanel;

impl Panel for TrialPanel {
    fn id(&self) -> PanelId {
        PanelId::Trial
    }

    fn inputs(&self) -> &'static [InputId] {
        &[
            InputId::OverviewClick,
            InputId::ParticipantClick,
            InputId::Measure,
        ]
    }

    fn render(&self, ctx: &PanelContext<'_>) -> Result<ChartSpec, PanelError> {
        let measure = &ctx.inputs.measure;
        let idx = measure_column(ctx.table, measure)?;
        let participant = &ctx.inputs.overview_click.participant;
        let trial = ctx.inputs.participant_click.trial;

        let mut chart = ChartSpec::new(
            format!("Each saccade in Trial {trial} - ({participant})"),
            "Saccade number",
            measure.name(),
        );
        let color = category_color(ctx, &mut chart);

        let saccades = saccade_rows(ctx.table, participant, trial);
        let point = |row: &Observation| -> Option<Point> {
            let saccade = row.saccade?;
            Some(Point {
                x: Coord::Number(saccade as f64),
                y: row.numeric(idx),
                label: format!("Saccade {saccade}"),
                data: PointData::Saccade { saccade },
            })
        };

        let mut series =
            ScatterSeries::new(SACCADES, color, plain_marker(ctx.config));
        series.points = saccades.rows().filter_map(point).collect();
        chart.push(series);

        let mut max = ScatterSeries::new(
            MAX_AMPLITUDE,
            ctx.config.highlight_color,
            max_marker(ctx.config),
        )
        .highlighted();
        max.points = max_amplitude_position(&saccades)?
            .and_then(|pos| saccades.get(pos))
            .and_then(point)
            .into_iter()
            .collect();
        chart.push(max);

        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Emphasis;
    use crate::color::{BLUE, RED};
    use crate::config::DashboardConfig;
    use crate::measure::Measure;
    use crate::panels::fixtures::*;
    use crate::selection::{Inputs, TrialIdentity};
    use proptest::prelude::*;

    fn trial_two(table: &crate::table::Table, measure: &str) -> Inputs {
        let config = DashboardConfig::default();
        let mut inputs = default_inputs(table, &config);
        inputs.measure = Measure::from(measure);
        inputs.participant_click = TrialIdentity { trial: 2 };
        inputs
    }

    #[test]
    fn saccades_of_clicked_trial_with_max_amplitude() {
        let table = scenario_table();
        let config = DashboardConfig::default();
        let inputs = trial_two(&table, "Amplitude");
        let ctx = PanelContext {
            table: &table,
            inputs: &inputs,
            config: &config,
        };

        let chart = TrialPanel.render(&ctx).unwrap();
        assert_eq!(chart.title, "Each saccade in Trial 2 - (gapBL401ak)");
        assert_eq!(chart.x_title, "Saccade number");

        let saccades = chart.scatter(SACCADES).unwrap();
        assert_eq!(saccades.points.len(), 4);
        assert_eq!(saccades.color, BLUE);
        assert_eq!(
            saccades.points.iter().map(|p| p.y).collect::<Vec<_>>(),
            vec![1.0, 3.5, 2.0, 0.5]
        );

        let max = chart.scatter(MAX_AMPLITUDE).unwrap();
        assert_eq!(max.emphasis, Emphasis::Highlighted);
        assert_eq!(max.color, RED);
        assert_eq!(max.points.len(), 1);
        assert_eq!(max.points[0].x, Coord::Number(1.0));
        assert_eq!(max.points[0].y, 3.5);
        assert_eq!(max.points[0].data, PointData::Saccade { saccade: 1 });
    }

    #[test]
    fn max_point_follows_amplitude_whatever_the_measure() {
        let table = scenario_table();
        let config = DashboardConfig::default();
        let inputs = trial_two(&table, "Latency");
        let ctx = PanelContext {
            table: &table,
            inputs: &inputs,
            config: &config,
        };
        let chart = TrialPanel.render(&ctx).unwrap();
        let max = chart.scatter(MAX_AMPLITUDE).unwrap();
        assert_eq!(max.points[0].label, "Saccade 1");
        assert_eq!(max.points[0].y, 210.0);
    }

    #[test]
    fn trial_without_saccades_has_empty_series() {
        let table = scenario_table();
        let config = DashboardConfig::default();
        let mut inputs = trial_two(&table, "Amplitude");
        inputs.participant_click = TrialIdentity { trial: 42 };
        let ctx = PanelContext {
            table: &table,
            inputs: &inputs,
            config: &config,
        };
        let chart = TrialPanel.render(&ctx).unwrap();
        assert!(chart.scatters().all(|s| s.points.is_empty()));
    }

    proptest! {
        #[test]
        fn exactly_one_max_point_at_the_maximum(
            amplitudes in proptest::collection::vec(-100.0f64..100.0, 1..12),
        ) {
            let table = table_from_amplitudes(&amplitudes);
            let config = DashboardConfig::default();
            let mut inputs = default_inputs(&table, &config);
            inputs.measure = Measure::from("Amplitude");
            let ctx = PanelContext {
                table: &table,
                inputs: &inputs,
                config: &config,
            };

            let chart = TrialPanel.render(&ctx).unwrap();
            let max = chart.scatter(MAX_AMPLITUDE).unwrap();
            prop_assert_eq!(max.points.len(), 1);
            let expected =
                amplitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(max.points[0].y, expected);
            let saccades = chart.scatter(SACCADES).unwrap();
            prop_assert_eq!(saccades.points.len(), amplitudes.len());
        }
    }
}
