//! Draws a `ChartSpec` with `egui_plot` and turns pointer input on the
//! plot back into point identities and hover payloads.

use eframe::egui::{self, Color32, Pos2};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, MarkerShape as PlotMarker, Plot,
    PlotPoint, PlotResponse, Points,
};
use saccade::chart::{
    Bin, ChartSpec, HistogramSeries, MarkerShape, Point, PointData, Trace,
};
use saccade::color::Rgb;
use saccade::selection::HoverBin;
use saccade::{PanelId, PanelOutput};
use std::ops::RangeInclusive;

/// Extra pick radius around a marker, in screen points
const PICK_SLACK: f32 = 4.0;

pub enum Interaction {
    Clicked(PointData),
    Hovered(Option<HoverBin>),
}

pub fn to_color32(rgb: Rgb, opacity: f32) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b).gamma_multiply(opacity)
}

fn plot_marker(shape: MarkerShape) -> PlotMarker {
    match shape {
        MarkerShape::Circle => PlotMarker::Circle,
        MarkerShape::Diamond => PlotMarker::Diamond,
        MarkerShape::Square => PlotMarker::Square,
    }
}

/// Tick label on a categorical axis: the category drawn at the nearest
/// integer position, blank between categories.
pub fn category_label(categories: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    categories
        .get(rounded as usize)
        .cloned()
        .unwrap_or_default()
}

/// The point whose marker contains `pointer`, closest first.
pub fn pick_point<'a>(
    chart: &'a ChartSpec,
    categories: &[String],
    pointer: Pos2,
    to_screen: impl Fn(f64, f64) -> Pos2,
) -> Option<&'a Point> {
    chart
        .scatters()
        .flat_map(|series| {
            let reach = series.marker.size / 2.0 + PICK_SLACK;
            series.points.iter().map(move |p| (p, reach))
        })
        .filter_map(|(point, reach)| {
            let x = point.x.position(categories)?;
            if !x.is_finite() || !point.y.is_finite() {
                return None;
            }
            let distance = to_screen(x, point.y).distance(pointer);
            (distance <= reach).then_some((point, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(point, _)| point)
}

/// The bin drawn under the plot coordinate `value`.
pub fn bin_under(
    histogram: &HistogramSeries,
    value: PlotPoint,
) -> Option<&Bin> {
    histogram
        .bin_at(value.x)
        .filter(|bin| value.y >= 0.0 && value.y <= bin.count as f64)
}

/// Draw one panel. `reset` re-fits the plot bounds to the data.
pub fn show(
    ui: &mut egui::Ui,
    panel: PanelId,
    output: &PanelOutput,
    reset: bool,
    height: f32,
) -> Option<Interaction> {
    let chart = match output {
        Ok(chart) => chart,
        Err(e) => {
            ui.colored_label(Color32::RED, format!("{panel}: {e}"));
            return None;
        }
    };

    ui.strong(&chart.title);
    for notice in &chart.notices {
        ui.colored_label(Color32::from_rgb(200, 140, 0), notice);
    }

    let categories = chart.x_categories();
    let mut plot = Plot::new(panel.to_string())
        .height(height)
        .x_axis_label(chart.x_title.clone())
        .y_axis_label(chart.y_title.clone())
        .legend(Legend::default());
    if !categories.is_empty() {
        let labels = categories.clone();
        plot = plot.x_axis_formatter(
            move |mark: GridMark, _range: &RangeInclusive<f64>| {
                category_label(&labels, mark.value)
            },
        );
    }
    if reset {
        plot = plot.reset();
    }

    let PlotResponse {
        response,
        transform,
        ..
    } = plot.show(ui, |plot_ui| {
        for trace in &chart.traces {
            match trace {
                Trace::Scatter(series) => {
                    let marker = &series.marker;
                    let points: Vec<[f64; 2]> = series
                        .points
                        .iter()
                        .filter_map(|p| {
                            Some([p.x.position(&categories)?, p.y])
                        })
                        .collect();
                    plot_ui.points(
                        Points::new(series.name.clone(), points)
                            .color(to_color32(series.color, marker.opacity))
                            .shape(plot_marker(marker.shape))
                            .radius(marker.size / 2.0)
                            .filled(true),
                    );
                }
                Trace::Histogram(histogram) => {
                    let bars = histogram
                        .bins
                        .iter()
                        .map(|b| {
                            Bar::new(b.center(), b.count as f64)
                                .width(b.width())
                        })
                        .collect();
                    plot_ui.bar_chart(
                        BarChart::new(histogram.name.clone(), bars)
                            .color(to_color32(histogram.color, 1.0)),
                    );
                }
            }
        }
    });

    if let Some(histogram) = chart.histogram() {
        let bin = response
            .hover_pos()
            .map(|pos| transform.value_from_position(pos))
            .and_then(|value| bin_under(histogram, value))
            .map(Bin::hover);
        return Some(Interaction::Hovered(bin));
    }

    if response.clicked()
        && let Some(pointer) = response.interact_pointer_pos()
    {
        let to_screen = |x: f64, y: f64| {
            transform.position_from_point(&PlotPoint::new(x, y))
        };
        return pick_point(chart, &categories, pointer, to_screen)
            .map(|point| Interaction::Clicked(point.data.clone()));
    }
    None
}
