use super::{
    Panel, PanelContext, PanelError, PanelId, color_for, measure_column,
    plain_marker,
};
use crate::chart::{ChartSpec, Coord, Point, PointData, ScatterSeries};
use crate::observation::Level;
use crate::selection::{ClickIdentity, InputId};
use crate::table::{Column, Predicate};

pub const TITLE: &str = "Median across trials for each participant";

/// Participant aggregates, one series per task, groups on the x axis.
pub struct OverviewPanel;

impl Panel for OverviewPanel {
    fn id(&self) -> PanelId {
        PanelId::Overview
    }

    fn inputs(&self) -> &'static [InputId] {
        &[InputId::Measure]
    }

    fn emits(&self) -> Option<InputId> {
        Some(InputId::OverviewClick)
    }

    fn render(&self, ctx: &PanelContext<'_>) -> Result<ChartSpec, PanelError> {
        let measure = &ctx.inputs.measure;
        let idx = measure_column(ctx.table, measure)?;
        let mut chart = ChartSpec::new(TITLE, "Group names", measure.name());

        let aggregates =
            ctx.table.filter(&[Predicate::level(Level::Participant)]);
        for task in aggregates.distinct(&Column::Task) {
            let color = color_for(ctx.config, &task, &mut chart);
            let marker = plain_marker(ctx.config);
            let mut series = ScatterSeries::new(task.as_str(), color, marker);
            series.points = aggregates
                .filter(&[Predicate::eq(Column::Task, task.as_str())])
                .rows()
                .map(|row| Point {
                    x: Coord::Category(row.group.clone()),
                    y: row.numeric(idx),
                    label: row.participant.clone(),
                    data: PointData::Participant(ClickIdentity {
                        participant: row.participant.clone(),
                        task: row.task.clone(),
                        group: row.group.clone(),
                    }),
                })
                .collect();
            chart.push(series);
        }

        Ok(chart)
    }
}
