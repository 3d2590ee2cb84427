use crate::color::Rgb;
use crate::selection::{ClickIdentity, HoverBin, TrialIdentity};
use serde::Serialize;

// ------------------------------------------------------------------
// Chart description
// ------------------------------------------------------------------

/// Everything a renderer needs to draw one panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub traces: Vec<Trace>,
    /// Non-fatal problems met while building the chart
    pub notices: Vec<String>,
}

impl ChartSpec {
    pub fn new(
        title: impl Into<String>,
        x_title: impl Into<String>,
        y_title: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_title: x_title.into(),
            y_title: y_title.into(),
            traces: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn push(&mut self, trace: impl Into<Trace>) {
        self.traces.push(trace.into());
    }

    pub fn notice(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }

    pub fn scatter(&self, name: &str) -> Option<&ScatterSeries> {
        self.scatters().find(|s| s.name == name)
    }

    pub fn scatters(&self) -> impl Iterator<Item = &ScatterSeries> {
        self.traces.iter().filter_map(|t| match t {
            Trace::Scatter(s) => Some(s),
            Trace::Histogram(_) => None,
        })
    }

    pub fn histogram(&self) -> Option<&HistogramSeries> {
        self.traces.iter().find_map(|t| match t {
            Trace::Histogram(h) => Some(h),
            Trace::Scatter(_) => None,
        })
    }

    /// Categorical x values across all scatter series, in order of first
    /// appearance. Category `i` is drawn at x = `i`.
    pub fn x_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for point in self.scatters().flat_map(|s| &s.points) {
            if let Coord::Category(c) = &point.x
                && !categories.contains(c)
            {
                categories.push(c.clone());
            }
        }
        categories
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Scatter(ScatterSeries),
    Histogram(HistogramSeries),
}

impl From<ScatterSeries> for Trace {
    fn from(s: ScatterSeries) -> Self {
        Trace::Scatter(s)
    }
}

impl From<HistogramSeries> for Trace {
    fn from(h: HistogramSeries) -> Self {
        Trace::Histogram(h)
    }
}

// ------------------------------------------------------------------
// Scatter
// ------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    Circle,
    Diamond,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    /// Diameter in screen points
    pub size: f32,
    pub opacity: f32,
    pub shape: MarkerShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Plain,
    Highlighted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub name: String,
    pub points: Vec<Point>,
    pub color: Rgb,
    pub marker: Marker,
    pub emphasis: Emphasis,
}

impl ScatterSeries {
    pub fn new(name: impl Into<String>, color: Rgb, marker: Marker) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
            color,
            marker,
            emphasis: Emphasis::Plain,
        }
    }

    pub fn highlighted(mut self) -> Self {
        self.emphasis = Emphasis::Highlighted;
        self
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Coord {
    Number(f64),
    Category(String),
}

impl Coord {
    /// Plot position of this coordinate; `None` for a category that is
    /// not in `categories`.
    pub fn position(&self, categories: &[String]) -> Option<f64> {
        match self {
            Coord::Number(x) => Some(*x),
            Coord::Category(c) => categories
                .iter()
                .position(|k| k == c)
                .map(|i| i as f64),
        }
    }
}

/// Identifying data attached to a point; handed back on click.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointData {
    Participant(ClickIdentity),
    Trial(TrialIdentity),
    Saccade { saccade: i64 },
    Target,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: Coord,
    pub y: f64,
    pub label: String,
    pub data: PointData,
}

// ------------------------------------------------------------------
// Histogram
// ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// Positions of the binned values in the input sequence
    pub point_indices: Vec<usize>,
}

impl Bin {
    pub fn center(&self) -> f64 {
        0.5 * (self.start + self.end)
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn hover(&self) -> HoverBin {
        HoverBin {
            point_indices: self.point_indices.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub name: String,
    pub bins: Vec<Bin>,
    pub color: Rgb,
}

impl HistogramSeries {
    /// Equal-width bins over the finite values; the last bin is closed on
    /// the right. A zero-width range is widened to one unit around the
    /// value. Non-finite values are left out of every bin.
    pub fn from_values(
        name: impl Into<String>,
        values: &[f64],
        bin_count: usize,
        color: Rgb,
    ) -> Self {
        let name = name.into();
        let finite: Vec<(usize, f64)> = values
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .collect();
        if finite.is_empty() || bin_count == 0 {
            return Self {
                name,
                bins: Vec::new(),
                color,
            };
        }

        let mut lo = finite
            .iter()
            .map(|(_, v)| *v)
            .fold(f64::INFINITY, f64::min);
        let mut hi = finite
            .iter()
            .map(|(_, v)| *v)
            .fold(f64::NEG_INFINITY, f64::max);
        if hi - lo == 0.0 {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bin_count as f64;

        let mut bins: Vec<Bin> = (0..bin_count)
            .map(|i| Bin {
                start: lo + i as f64 * width,
                end: if i + 1 == bin_count {
                    hi
                } else {
                    lo + (i + 1) as f64 * width
                },
                count: 0,
                point_indices: Vec::new(),
            })
            .collect();

        for (idx, v) in finite {
            let slot =
                (((v - lo) / width).floor() as usize).min(bin_count - 1);
            bins[slot].count += 1;
            bins[slot].point_indices.push(idx);
        }

        Self { name, bins, color }
    }

    /// The bin covering `x`, if any.
    pub fn bin_at(&self, x: f64) -> Option<&Bin> {
        let last = self.bins.len().checked_sub(1)?;
        self.bins.iter().enumerate().find_map(|(i, b)| {
            let inside =
                x >= b.start && (x < b.end || (i == last && x == b.end));
            inside.then_some(b)
        })
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}
