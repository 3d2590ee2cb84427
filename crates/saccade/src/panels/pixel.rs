use super::{
    Panel, PanelContext, PanelError, PanelId, category_color,
    max_amplitude_position, max_marker, plain_marker, required_column,
    saccade_rows,
};
use crate::chart::{
    ChartSpec, Coord, Marker, MarkerShape, Point, PointData, ScatterSeries,
};
use crate::observation::{SACCADE_X, SACCADE_Y, TARGET_X, TARGET_Y};
use crate::selection::InputId;
use crate::table::Predicate;

pub const SACCADES: &str = "Saccades";
pub const TARGET: &str = "Target";
pub const MAX_AMPLITUDE: &str = "Max Amplitude";

/// Screen positions of the clicked trial's saccades and of its target.
pub struct PixelSpacePanel;

impl Panel for PixelSpacePanel {
    fn id(&self) -> PanelId {
        PanelId::PixelSpace
    }

    fn inputs(&self) -> &'static [InputId] {
        &[InputId::OverviewClick, InputId::ParticipantClick]
    }

    fn render(&self, ctx: &PanelContext<'_>) -> Result<ChartSpec, PanelError> {
        let sx = required_column(ctx.table, SACCADE_X)?;
        let sy = required_column(ctx.table, SACCADE_Y)?;
        let tx = required_column(ctx.table, TARGET_X)?;
        let ty = required_column(ctx.table, TARGET_Y)?;
        let participant = &ctx.inputs.overview_click.participant;
        let trial = ctx.inputs.participant_click.trial;

        let mut chart = ChartSpec::new(
            format!("Saccade positions in Trial {trial} - ({participant})"),
            "X",
            "Y",
        );
        let color = category_color(ctx, &mut chart);
        let saccades = saccade_rows(ctx.table, participant, trial);

        let landing: Vec<Point> = saccades
            .rows()
            .filter_map(|row| {
                let saccade = row.saccade?;
                Some(Point {
                    x: Coord::Number(row.numeric(sx)),
                    y: row.numeric(sy),
                    label: format!("Saccade {saccade}"),
                    data: PointData::Saccade { saccade },
                })
            })
            .collect();

        // The target is recorded on the first saccade of the trial
        let mut target = ScatterSeries::new(
            TARGET,
            ctx.config.target_color,
            Marker {
                shape: MarkerShape::Square,
                ..plain_marker(ctx.config)
            },
        );
        target.points = saccades
            .filter(&[Predicate::saccade(0)])
            .rows()
            .map(|row| Point {
                x: Coord::Number(row.numeric(tx)),
                y: row.numeric(ty),
                label: TARGET.to_string(),
                data: PointData::Target,
            })
            .collect();

        let mut max = ScatterSeries::new(
            MAX_AMPLITUDE,
            ctx.config.highlight_color,
            max_marker(ctx.config),
        )
        .highlighted();
        if let Some(pos) = max_amplitude_position(&saccades)?
            && let Some(point) = landing.get(pos)
        {
            max.points.push(point.clone());
        }

        let mut series =
            ScatterSeries::new(SACCADES, color, plain_marker(ctx.config));
        series.points = landing;
        chart.push(series);
        chart.push(target);
        chart.push(max);
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::INK;
    use crate::config::DashboardConfig;
    use crate::panels::fixtures::*;
    use crate::selection::TrialIdentity;
    use crate::table::Table;

    #[test]
    fn landing_positions_target_and_max() {
        let table = scenario_table();
        let config = DashboardConfig::default();
        let mut inputs = default_inputs(&table, &config);
        inputs.participant_click = TrialIdentity { trial: 2 };
        let ctx = PanelContext {
            table: &table,
            inputs: &inputs,
            config: &config,
        };

        let chart = PixelSpacePanel.render(&ctx).unwrap();
        assert_eq!(chart.title, "Saccade positions in Trial 2 - (gapBL401ak)");
        assert_eq!(chart.x_title, "X");
        assert_eq!(chart.y_title, "Y");

        let saccades = chart.scatter(SACCADES).unwrap();
        let xy: Vec<(Coord, f64)> = saccades
            .points
            .iter()
            .map(|p| (p.x.clone(), p.y))
            .collect();
        assert_eq!(
            xy,
            vec![
                (Coord::Number(420.0), 305.0),
                (Coord::Number(505.0), 298.0),
                (Coord::Number(515.0), 302.0),
                (Coord::Number(511.0), 301.0),
            ]
        );

        let target = chart.scatter(TARGET).unwrap();
        assert_eq!(target.color, INK);
        assert_eq!(target.marker.shape, MarkerShape::Square);
        assert_eq!(target.points.len(), 1);
        assert_eq!(target.points[0].x, Coord::Number(512.0));
        assert_eq!(target.points[0].y, 300.0);

        let max = chart.scatter(MAX_AMPLITUDE).unwrap();
        assert_eq!(max.points.len(), 1);
        assert_eq!(max.points[0].x, Coord::Number(505.0));
    }

    #[test]
    fn missing_position_columns_fail_this_panel() {
        let csv = "Task,Group,Participant,Trial,Saccade,Amplitude,Level\n\
                   GAP,BL,p,1,0,1.0,S\n";
        let table = Table::from_reader(csv.as_bytes()).unwrap();
        let config = DashboardConfig::default();
        let inputs = default_inputs(&table, &config);
        let ctx = PanelContext {
            table: &table,
            inputs: &inputs,
            config: &config,
        };
        assert_eq!(
            PixelSpacePanel.render(&ctx),
            Err(PanelError::MissingColumn("Saccade-X"))
        );
    }
}
