use super::{
    Panel, PanelContext, PanelError, PanelId, category_color,
    emphasis_marker, measure_column, plain_marker, trial_rows,
};
use crate::chart::{ChartSpec, Coord, Point, PointData, ScatterSeries};
use crate::selection::{InputId, TrialIdentity};

pub const TRIALS: &str = "Trials";
pub const HOVERED: &str = "Hovered bin";

/// Trial aggregates of the clicked participant; points inside the
/// hovered histogram bin are repeated in an emphasized series.
pub struct ParticipantPanel;

impl Panel for ParticipantPanel {
    fn id(&self) -> PanelId {
        PanelId::Participant
    }

    fn inputs(&self) -> &'static [InputId] {
        &[
            InputId::OverviewClick,
            InputId::Measure,
            InputId::HistogramHover,
        ]
    }

    fn emits(&self) -> Option<InputId> {
        Some(InputId::ParticipantClick)
    }

    fn render(&self, ctx: &PanelContext<'_>) -> Result<ChartSpec, PanelError> {
        let measure = &ctx.inputs.measure;
        let idx = measure_column(ctx.table, measure)?;
        let participant = &ctx.inputs.overview_click.participant;

        let mut chart = ChartSpec::new(
            format!("Medians for each trial - ({participant})"),
            "Trial number",
            measure.name(),
        );
        let color = category_color(ctx, &mut chart);

        let mut trials =
            ScatterSeries::new(TRIALS, color, plain_marker(ctx.config));
        trials.points = trial_rows(ctx.table, participant)
            .rows()
            .filter_map(|row| {
                let trial = row.trial?;
                Some(Point {
                    x: Coord::Number(trial as f64),
                    y: row.numeric(idx),
                    label: format!("Trial {trial}"),
                    data: PointData::Trial(TrialIdentity { trial }),
                })
            })
            .collect();

        let hovered = ctx.inputs.histogram_hover.as_ref().map(|hover| {
            let mut series =
                ScatterSeries::new(HOVERED, color, emphasis_marker(ctx.config))
                    .highlighted();
            // Kept in the order of the trial series, whatever the payload order
            series.points = trials
                .points
                .iter()
                .enumerate()
                .filter(|(i, _)| hover.point_indices.contains(i))
                .map(|(_, p)| p.clone())
                .collect();
            series
        });

        chart.push(trials);
        if let Some(series) = hovered {
            chart.push(series);
        }
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Emphasis;
    use crate::color::{BLUE, GRAY};
    use crate::config::DashboardConfig;
    use crate::measure::Measure;
    use crate::observation::Level;
    use crate::panels::fixtures::*;
    use crate::panels::{HistogramPanel, trial_rows};
    use crate::selection::{ClickIdentity, HoverBin};
    use crate::table::Predicate;
    use proptest::prelude::*;

    fn click(participant: &str, task: &str) -> ClickIdentity {
        ClickIdentity {
            participant: participant.into(),
            task: task.into(),
            group: "BL".into(),
        }
    }

    #[test]
    fn trial_series_for_clicked_participant() {
        let table = scenario_table();
        let config = DashboardConfig::default();
        let mut inputs = default_inputs(&table, &config);
        inputs.measure = Measure::from("Amplitude");
        let ctx = PanelContext {
            table: &table,
            inputs: &inputs,
            config: &config,
        };

        let chart = ParticipantPanel.render(&ctx).unwrap();
        assert_eq!(chart.title, "Medians for each trial - (gapBL401ak)");
        assert_eq!(chart.traces.len(), 1);

        let trials = chart.scatter(TRIALS).unwrap();
        let labels: Vec<&str> = trials.labels().collect();
        assert_eq!(labels, vec!["Trial 1", "Trial 2", "Trial 3"]);
        assert_eq!(
            trials.points.iter().map(|p| p.y).collect::<Vec<_>>(),
            vec![1.5, 2.0, 2.5]
        );
        assert_eq!(
            trials.points[1].data,
            PointData::Trial(TrialIdentity { trial: 2 })
        );
        assert_eq!(trials.color, BLUE);
        assert!(chart.notices.is_empty());
    }

    #[test]
    fn hovered_bin_adds_emphasized_series_in_series_order() {
        let table = scenario_table();
        let config = DashboardConfig::default();
        let mut inputs = default_inputs(&table, &config);
        inputs.histogram_hover = Some(HoverBin {
            point_indices: vec![2, 0, 17],
        });
        let ctx = PanelContext {
            table: &table,
            inputs: &inputs,
            config: &config,
        };

        let chart = ParticipantPanel.render(&ctx).unwrap();
        let hovered = chart.scatter(HOVERED).unwrap();
        assert_eq!(hovered.emphasis, Emphasis::Highlighted);
        assert_eq!(hovered.color, BLUE);
        assert_eq!(
            hovered.labels().collect::<Vec<_>>(),
            vec!["Trial 1", "Trial 3"]
        );
    }

    #[test]
    fn unmapped_category_uses_fallback_color() {
        let table = scenario_table();
        let config = DashboardConfig::default();
        let mut inputs = default_inputs(&table, &config);
        inputs.overview_click = click("antiHC501qq", "ANTI");
        inputs.histogram_hover = Some(HoverBin {
            point_indices: vec![0],
        });
        let ctx = PanelContext {
            table: &table,
            inputs: &inputs,
            config: &config,
        };

        let chart = ParticipantPanel.render(&ctx).unwrap();
        assert!(chart.scatters().all(|s| s.color == GRAY));
        assert_eq!(
            chart.notices,
            vec!["no color configured for category \"ANTI\"".to_string()]
        );
    }

    #[test]
    fn unknown_participant_renders_empty_chart() {
        let table = scenario_table();
        let config = DashboardConfig::default();
        let mut inputs = default_inputs(&table, &config);
        inputs.overview_click = click("nobody", "GAP");
        let ctx = PanelContext {
            table: &table,
            inputs: &inputs,
            config: &config,
        };
        let chart = ParticipantPanel.render(&ctx).unwrap();
        assert!(chart.scatter(TRIALS).unwrap().points.is_empty());
    }

    proptest! {
        #[test]
        fn trial_series_is_exactly_the_trial_rows(table in arb_table()) {
            let config = DashboardConfig::default();
            let participants = table
                .filter(&[Predicate::level(Level::Participant)])
                .rows()
                .map(|r| click(&r.participant, &r.task))
                .collect::<Vec<_>>();
            for identity in participants {
                let mut inputs = default_inputs(&table, &config);
                inputs.overview_click = identity.clone();
                let ctx = PanelContext {
                table: &table,
                inputs: &inputs,
                config: &config,
            };
                let chart = ParticipantPanel.render(&ctx).unwrap();

                let expected: Vec<i64> = table
                    .filter(&[
                        Predicate::participant(&identity.participant),
                        Predicate::level(Level::Trial),
                    ])
                    .rows()
                    .filter_map(|r| r.trial)
                    .collect();
                let plotted: Vec<i64> = chart
                    .scatter(TRIALS)
                    .unwrap()
                    .points
                    .iter()
                    .map(|p| match p.data {
                        PointData::Trial(t) => t.trial,
                        _ => unreachable!(),
                    })
                    .collect();
                prop_assert_eq!(plotted, expected);
            }
        }

        #[test]
        fn histogram_hover_highlights_trials_at_bin_indices(
            table in arb_table(),
            bin_choice in 0usize..10,
        ) {
            let config = DashboardConfig::default();
            let mut inputs = default_inputs(&table, &config);
            let ctx = PanelContext {
                table: &table,
                inputs: &inputs,
                config: &config,
            };
            let histogram = HistogramPanel.render(&ctx).unwrap();
            let bins = &histogram.histogram().unwrap().bins;
            let hover = bins[bin_choice % bins.len()].hover();

            let expected: Vec<String> = hover
                .point_indices
                .iter()
                .map(|&i| {
                    let participant = &inputs.overview_click.participant;
                    let row = trial_rows(&table, participant).get(i).unwrap();
                    format!("Trial {}", row.trial.unwrap())
                })
                .collect();

            inputs.histogram_hover = Some(hover);
            let ctx = PanelContext {
                table: &table,
                inputs: &inputs,
                config: &config,
            };
            let chart = ParticipantPanel.render(&ctx).unwrap();
            let highlighted: Vec<String> = chart
                .scatter(HOVERED)
                .unwrap()
                .labels()
                .map(str::to_string)
                .collect();
            prop_assert_eq!(highlighted, expected);
        }
    }
}
