use super::{
    Panel, PanelContext, PanelError, PanelId, category_color, measure_column,
    trial_rows,
};
use crate::chart::{ChartSpec, HistogramSeries};
use crate::selection::InputId;

pub const SERIES: &str = "Trial medians";

pub struct HistogramPanel;

impl Panel for HistogramPanel {
    fn id(&self) -> PanelId {
        PanelId::Histogram
    }

    fn inputs(&self) -> &'static [InputId] {
        &[InputId::OverviewClick, InputId::Measure]
    }

    fn emits(&self) -> Option<InputId> {
        Some(InputId::HistogramHover)
    }

    fn render(&self, ctx: &PanelContext<'_>) -> Result<ChartSpec, PanelError> {
        let measure = &ctx.inputs.measure;
        measure_column(ctx.table, measure)?;
        let participant = &ctx.inputs.overview_click.participant;

        let mut chart = ChartSpec::new(
            format!("Distribution of trial medians - ({participant})"),
            measure.name(),
            "Trials",
        );
        let color = category_color(ctx, &mut chart);
        // Bin point indices line up with the participant panel's trial series
        let values = trial_rows(ctx.table, participant).values(measure.name());
        chart.push(HistogramSeries::from_values(
            SERIES,
            &values,
            ctx.config.histogram_bins,
            color,
        ));
        Ok(chart)
    }
}
