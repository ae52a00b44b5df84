//! PNG Chart Rendering
//!
//! One line series per algorithm: x = backend count (log scale),
//! y = ns/op (linear), point markers joined by lines, legend in the top-left
//! corner of the plot area.
//!
//! ```text
//!            Load Balancer Algorithm Performance vs Backend Count
//!        ┌─────────────────────────────────────────────────────┐
//!   2000 ┤ ┌───────────┐                                    ●  │
//!        │ │ ● IPHash  │                               ●╱      │
//!   1000 ┤ │ ● Weighted│                     ●───────●         │
//!        │ └───────────┘       ●────────●                      │
//!      0 ┼─────────────┬──────────────┬──────────────┬─────────┘
//!                     10             100            1000
//!                        Number of Backends (log scale)
//! ```

mod axis;
mod canvas;

pub use axis::{LinearAxis, LogAxis, Tick};
pub use canvas::{Canvas, Rgb};

use crate::ReportError;
use canvas::GLYPH_HEIGHT;
use lbbench_core::ResultSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Smallest canvas the layout below fits on
const MIN_WIDTH: u32 = 320;
const MIN_HEIGHT: u32 = 240;

const MARGIN_LEFT: i64 = 130;
const MARGIN_RIGHT: i64 = 40;
const MARGIN_TOP: i64 = 70;
const MARGIN_BOTTOM: i64 = 90;

const TITLE_SCALE: u32 = 2;
const LABEL_SCALE: u32 = 2;
const TICK_SCALE: u32 = 2;
const TICK_LENGTH: i64 = 6;

const LINE_THICKNESS: u32 = 2;
const MARKER_RADIUS: i64 = 5;

const GRID_COLOR: Rgb = Rgb::from_hex(0xdddddd);
const AXIS_COLOR: Rgb = Rgb::from_hex(0x333333);
const LEGEND_BORDER: Rgb = Rgb::from_hex(0xbbbbbb);

/// Qualitative palette cycled in algorithm-name order
const PALETTE: [Rgb; 10] = [
    Rgb::from_hex(0x1f77b4),
    Rgb::from_hex(0xff7f0e),
    Rgb::from_hex(0x2ca02c),
    Rgb::from_hex(0xd62728),
    Rgb::from_hex(0x9467bd),
    Rgb::from_hex(0x8c564b),
    Rgb::from_hex(0xe377c2),
    Rgb::from_hex(0x7f7f7f),
    Rgb::from_hex(0xbcbd22),
    Rgb::from_hex(0x17becf),
];

/// Colour assigned to the `index`-th series
pub fn series_color(index: usize) -> Rgb {
    PALETTE[index % PALETTE.len()]
}

/// Chart appearance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Image width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Image height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
    /// Title drawn above the plot
    #[serde(default = "default_title")]
    pub title: String,
    /// X axis caption
    #[serde(default = "default_x_label")]
    pub x_label: String,
    /// Y axis caption
    #[serde(default = "default_y_label")]
    pub y_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
            x_label: default_x_label(),
            y_label: default_y_label(),
        }
    }
}

fn default_width() -> u32 {
    1200
}
fn default_height() -> u32 {
    800
}
fn default_title() -> String {
    "Load Balancer Algorithm Performance vs Backend Count".to_string()
}
fn default_x_label() -> String {
    "Number of Backends (log scale)".to_string()
}
fn default_y_label() -> String {
    "Time per Operation (ns)".to_string()
}

/// Plot area in canvas pixels
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl PlotArea {
    fn for_canvas(width: u32, height: u32) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            right: width as i64 - MARGIN_RIGHT,
            bottom: height as i64 - MARGIN_BOTTOM,
        }
    }

    fn x(&self, fraction: f64) -> i64 {
        self.left + (fraction * (self.right - self.left) as f64).round() as i64
    }

    fn y(&self, fraction: f64) -> i64 {
        self.bottom - (fraction * (self.bottom - self.top) as f64).round() as i64
    }
}

/// Points of one series that can be placed on the axes
struct PlotSeries<'a> {
    name: &'a str,
    color: Rgb,
    points: Vec<(f64, f64)>,
}

fn plottable_series(results: &ResultSet) -> Vec<PlotSeries<'_>> {
    results
        .iter()
        .enumerate()
        .map(|(index, (name, series))| {
            let points: Vec<(f64, f64)> = series
                .iter()
                .filter(|m| {
                    let ok = m.backend_count > 0 && m.ns_per_op.is_finite();
                    if !ok {
                        warn!(
                            algorithm = name,
                            backend_count = m.backend_count,
                            ns_per_op = m.ns_per_op,
                            "skipping point that cannot be drawn on a log axis"
                        );
                    }
                    ok
                })
                .map(|m| (m.backend_count as f64, m.ns_per_op))
                .collect();
            PlotSeries {
                name,
                color: series_color(index),
                points,
            }
        })
        .collect()
}

/// Render the comparison chart into a canvas.
///
/// Fails on an empty result set rather than producing a blank image.
pub fn render_chart(results: &ResultSet, config: &ChartConfig) -> Result<Canvas, ReportError> {
    if results.is_empty() {
        return Err(ReportError::EmptyResultSet);
    }
    if config.width < MIN_WIDTH || config.height < MIN_HEIGHT {
        return Err(ReportError::InvalidDimensions {
            width: config.width,
            height: config.height,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
        });
    }

    let series = plottable_series(results);
    let all_points = || series.iter().flat_map(|s| s.points.iter().copied());
    if all_points().next().is_none() {
        return Err(ReportError::NoPlottablePoints);
    }

    let (x_min, x_max) = all_points()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (x, _)| {
            (lo.min(x), hi.max(x))
        });
    let (y_min, y_max) = all_points()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| {
            (lo.min(y), hi.max(y))
        });
    let x_axis = LogAxis::covering(x_min, x_max);
    let y_axis = LinearAxis::covering(y_min, y_max);
    debug!(?x_axis, ?y_axis, series = series.len(), "chart axes");

    let mut canvas = Canvas::new(config.width, config.height, Rgb::WHITE);
    let area = PlotArea::for_canvas(config.width, config.height);

    draw_grid(&mut canvas, &area, &x_axis, &y_axis);
    draw_series(&mut canvas, &area, &x_axis, &y_axis, &series);
    draw_frame(&mut canvas, &area);
    draw_labels(&mut canvas, &area, config);
    draw_legend(&mut canvas, &area, &series);

    Ok(canvas)
}

/// Render the chart and encode it as PNG bytes, without touching disk
pub fn render_chart_png(
    results: &ResultSet,
    config: &ChartConfig,
) -> Result<Vec<u8>, ReportError> {
    let canvas = render_chart(results, config)?;
    Ok(canvas.encode_png()?)
}

/// Render and save the chart as PNG, replacing any existing file
pub fn write_chart(
    path: &Path,
    results: &ResultSet,
    config: &ChartConfig,
) -> Result<(), ReportError> {
    let bytes = render_chart_png(results, config)?;
    std::fs::write(path, &bytes).map_err(|e| ReportError::io(path, e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote chart");
    Ok(())
}

fn draw_grid(canvas: &mut Canvas, area: &PlotArea, x_axis: &LogAxis, y_axis: &LinearAxis) {
    let tick_height = GLYPH_HEIGHT * TICK_SCALE as i64;

    for tick in x_axis.ticks() {
        let x = area.x(x_axis.fraction(tick.value));
        canvas.line(x, area.top, x, area.bottom, GRID_COLOR, 1);
        canvas.line(x, area.bottom, x, area.bottom + TICK_LENGTH, AXIS_COLOR, 1);
        let w = Canvas::text_width(&tick.label, TICK_SCALE);
        canvas.text(
            x - w / 2,
            area.bottom + TICK_LENGTH + 6,
            &tick.label,
            AXIS_COLOR,
            TICK_SCALE,
        );
    }

    for tick in y_axis.ticks() {
        let y = area.y(y_axis.fraction(tick.value));
        canvas.line(area.left, y, area.right, y, GRID_COLOR, 1);
        canvas.line(area.left - TICK_LENGTH, y, area.left, y, AXIS_COLOR, 1);
        let w = Canvas::text_width(&tick.label, TICK_SCALE);
        canvas.text(
            area.left - TICK_LENGTH - 6 - w,
            y - tick_height / 2,
            &tick.label,
            AXIS_COLOR,
            TICK_SCALE,
        );
    }
}

fn draw_series(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &LogAxis,
    y_axis: &LinearAxis,
    series: &[PlotSeries<'_>],
) {
    for s in series {
        let pixels: Vec<(i64, i64)> = s
            .points
            .iter()
            .map(|&(x, y)| (area.x(x_axis.fraction(x)), area.y(y_axis.fraction(y))))
            .collect();

        for pair in pixels.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            canvas.line(x0, y0, x1, y1, s.color, LINE_THICKNESS);
        }
        for &(x, y) in &pixels {
            canvas.fill_circle(x, y, MARKER_RADIUS, s.color);
        }
    }
}

fn draw_frame(canvas: &mut Canvas, area: &PlotArea) {
    canvas.stroke_rect(area.left, area.top, area.right, area.bottom, AXIS_COLOR);
}

fn draw_labels(canvas: &mut Canvas, area: &PlotArea, config: &ChartConfig) {
    let width = config.width as i64;
    let height = config.height as i64;

    let title_w = Canvas::text_width(&config.title, TITLE_SCALE);
    canvas.text((width - title_w) / 2, 24, &config.title, Rgb::BLACK, TITLE_SCALE);

    let x_label_w = Canvas::text_width(&config.x_label, LABEL_SCALE);
    let plot_center_x = (area.left + area.right) / 2;
    canvas.text(
        plot_center_x - x_label_w / 2,
        height - 36,
        &config.x_label,
        Rgb::BLACK,
        LABEL_SCALE,
    );

    let y_label_h = Canvas::text_width(&config.y_label, LABEL_SCALE);
    let plot_center_y = (area.top + area.bottom) / 2;
    canvas.text_vertical(
        8,
        plot_center_y + y_label_h / 2,
        &config.y_label,
        Rgb::BLACK,
        LABEL_SCALE,
    );
}

fn draw_legend(canvas: &mut Canvas, area: &PlotArea, series: &[PlotSeries<'_>]) {
    let row_height = GLYPH_HEIGHT * LABEL_SCALE as i64 + 10;
    let swatch = 36;
    let padding = 10;
    let name_width = series
        .iter()
        .map(|s| Canvas::text_width(s.name, LABEL_SCALE))
        .max()
        .unwrap_or(0);

    let left = area.left + 16;
    let top = area.top + 16;
    let right = left + padding * 2 + swatch + 8 + name_width;
    let bottom = top + padding * 2 + row_height * series.len() as i64 - 10;

    canvas.fill_rect(left, top, right, bottom, Rgb::WHITE);
    canvas.stroke_rect(left, top, right, bottom, LEGEND_BORDER);

    for (i, s) in series.iter().enumerate() {
        let row_top = top + padding + i as i64 * row_height;
        let mid = row_top + GLYPH_HEIGHT * LABEL_SCALE as i64 / 2;
        let sx = left + padding;
        canvas.line(sx, mid, sx + swatch, mid, s.color, LINE_THICKNESS);
        canvas.fill_circle(sx + swatch / 2, mid, MARKER_RADIUS, s.color);
        canvas.text(sx + swatch + 8, row_top, s.name, Rgb::BLACK, LABEL_SCALE);
    }
}
