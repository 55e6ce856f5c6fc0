// src/plot_framework.rs

use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{Circle, Cross, PathElement, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use ndarray::Array1;
use ndarray_stats::QuantileExt;

use std::error::Error;
use std::ops::Range;

use crate::constants::{
    FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND, FONT_SIZE_MAIN_TITLE,
    FONT_SIZE_MESSAGE, LINE_WIDTH_LEGEND, PLOT_HEIGHT, PLOT_WIDTH,
};

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Y-axis tick label: "M"/"k" notation for large values, one decimal for
/// fractional ticks, three for sub-unit ticks.
pub fn format_axis_value(v: f64) -> String {
    let a = v.abs();
    if a >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if a >= 10_000.0 {
        format!("{:.0}k", v / 1000.0)
    } else if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else if a < 1.0 {
        format!("{:.3}", v)
    } else {
        format!("{:.1}", v)
    }
}

/// Zero-order-hold polyline: each value holds until the next sample time.
pub fn step_post(data: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(data.len() * 2);
    for pair in data.windows(2) {
        let ((x0, y0), (x1, _)) = (pair[0], pair[1]);
        out.push((x0, y0));
        out.push((x1, y0));
    }
    if let Some(&last) = data.last() {
        out.push(last);
    }
    out
}

/// Pairs `time` with `values`, keeping every n-th sample so that at most
/// `max_points` points are drawn.
pub fn sampled_series(time: &[f64], values: &[f64], max_points: usize) -> Vec<(f64, f64)> {
    let n = time.len().min(values.len());
    let stride = n.div_ceil(max_points.max(1)).max(1);
    (0..n).step_by(stride).map(|i| (time[i], values[i])).collect()
}

/// Finite (min, max) of a value set, skipping NaN.
pub fn finite_bounds<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    let arr: Array1<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if arr.is_empty() {
        return None;
    }
    Some((*arr.min_skipnan(), *arr.max_skipnan()))
}

/// Padded x/y ranges covering every point of every series.
pub fn series_ranges(series: &[PlotSeries]) -> Option<(Range<f64>, Range<f64>)> {
    let points = || series.iter().flat_map(|s| s.data.iter());
    let (x_min, x_max) = finite_bounds(points().map(|p| p.0))?;
    let (y_min, y_max) = finite_bounds(points().map(|p| p.1))?;
    let (y_lo, y_hi) = calculate_range(y_min, y_max);
    let x_range = if x_max > x_min { x_min..x_max } else { x_min - 0.5..x_max + 0.5 };
    Some((x_range, y_lo..y_hi))
}

/// Viridis colour for entry `index` of `count` evenly spaced series.
pub fn palette_color(index: usize, count: usize) -> RGBColor {
    let color = colorous::VIRIDIS.eval_rational(index.min(count.saturating_sub(1)), count.max(1));
    RGBColor(color.r, color.g, color.b)
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(
    area: &DrawingArea<BitMapBackend, Shift>,
    panel_name: &str,
    plot_type: &str,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    const CHAR_WIDTH_RATIO: f32 = 0.6; // Approximate character width relative to font size
    const LINE_HEIGHT_SPACING: i32 = 4;

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (x_range.end - x_range.start, y_range.end - y_range.start);
    let message = format!("{panel_name} {plot_type} Data Unavailable:\n{reason}");

    let estimated_char_width = (FONT_SIZE_MESSAGE as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_line_height = FONT_SIZE_MESSAGE + LINE_HEIGHT_SPACING;
    let lines: Vec<&str> = message.split('\n').collect();
    let max_line_length = lines.iter().map(|line| line.len()).max().unwrap_or(0) as i32;

    let center_x = width / 2 - max_line_length * estimated_char_width / 2;
    let center_y = height / 2 - lines.len() as i32 * estimated_line_height / 2;

    let text_style = ("sans-serif", FONT_SIZE_MESSAGE).into_font().color(&RED);
    for (i, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            line.to_string(),
            (center_x, center_y + i as i32 * estimated_line_height),
            text_style.clone(),
        ))?;
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    None,
    Circle,
    Cross,
}

#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
    pub opacity: f64,
    pub marker: Marker,
}

impl PlotSeries {
    pub fn line(data: Vec<(f64, f64)>, label: impl Into<String>, color: RGBColor, stroke_width: u32) -> Self {
        Self {
            data,
            label: label.into(),
            color,
            stroke_width,
            opacity: 1.0,
            marker: Marker::None,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }
}

/// Straight reference line across the whole chart, drawn dotted.
#[derive(Clone)]
pub enum ReferenceLine {
    Horizontal { y: f64, color: RGBColor, label: String },
    Vertical { x: f64, color: RGBColor, label: String },
}

#[derive(Clone)]
pub struct PlotConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
    pub x_label: String,
    pub y_label: String,
    pub reference_lines: Vec<ReferenceLine>,
}

impl PlotConfig {
    fn has_data(&self) -> bool {
        self.series.iter().any(|s| !s.data.is_empty())
    }

    fn valid_ranges(&self) -> bool {
        self.x_range.end > self.x_range.start && self.y_range.end > self.y_range.start
    }
}

fn dotted_segments(from: (f64, f64), to: (f64, f64)) -> Vec<[(f64, f64); 2]> {
    const NUM_SEGMENTS: usize = 40; // Dash count, half dash half gap
    let step = 1.0 / (NUM_SEGMENTS as f64 * 2.0);
    (0..NUM_SEGMENTS)
        .map(|i| {
            let t0 = 2.0 * i as f64 * step;
            let t1 = t0 + step;
            let lerp = |t: f64| (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
            [lerp(t0), lerp(t1)]
        })
        .collect()
}

/// Draws a single chart using a PlotConfig struct.
fn draw_single_chart(
    area: &DrawingArea<BitMapBackend, Shift>,
    plot_config: &PlotConfig,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(&plot_config.title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(plot_config.x_range.clone(), plot_config.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(&plot_config.x_label)
        .y_desc(&plot_config.y_label)
        .x_labels(20)
        .y_labels(10)
        .y_label_formatter(&|y| format_axis_value(*y))
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    let mut legend_series_count = 0;
    let (x0, x1) = (plot_config.x_range.start, plot_config.x_range.end);
    let (y0, y1) = (plot_config.y_range.start, plot_config.y_range.end);

    for line in &plot_config.reference_lines {
        let (from, to, color, label) = match line {
            ReferenceLine::Horizontal { y, color, label } => ((x0, *y), (x1, *y), *color, label),
            ReferenceLine::Vertical { x, color, label } => ((*x, y0), (*x, y1), *color, label),
        };
        if !(from.0.is_finite() && from.1.is_finite()) {
            continue; // skip malformed input
        }
        let style = color.stroke_width(LINE_WIDTH_LEGEND);
        let anno = chart.draw_series(
            dotted_segments(from, to)
                .into_iter()
                .map(|segment| PathElement::new(segment.to_vec(), style)),
        )?;
        if !label.is_empty() {
            anno.label(label.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH_LEGEND))
            });
            legend_series_count += 1;
        }
    }

    for s in &plot_config.series {
        if s.data.is_empty() {
            continue;
        }
        let color = s.color.mix(s.opacity);
        let anno = match s.marker {
            Marker::None => chart.draw_series(LineSeries::new(
                s.data.iter().copied(),
                color.stroke_width(s.stroke_width),
            ))?,
            Marker::Circle => {
                chart.draw_series(LineSeries::new(s.data.iter().copied(), color.stroke_width(s.stroke_width)))?;
                chart.draw_series(s.data.iter().map(|&p| Circle::new(p, 5, color.filled())))?
            }
            Marker::Cross => {
                chart.draw_series(LineSeries::new(s.data.iter().copied(), color.stroke_width(s.stroke_width)))?;
                chart.draw_series(s.data.iter().map(|&p| Cross::new(p, 6, color.stroke_width(2))))?
            }
        };

        if !s.label.is_empty() {
            anno.label(&s.label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH_LEGEND))
            });
            legend_series_count += 1;
        }
    }

    if legend_series_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", FONT_SIZE_LEGEND))
            .draw()?;
    }

    Ok(())
}

/// Creates a plot image with `panel_names.len()` charts stacked vertically.
/// `get_panel_config` returns `None` when a panel cannot be computed; such
/// panels show a placeholder message instead.
pub fn draw_stacked_plot<F>(
    output_filename: &str,
    root_name: &str,
    plot_type_name: &str,
    panel_names: &[&str],
    mut get_panel_config: F,
) -> Result<(), Box<dyn Error>>
where
    F: FnMut(usize) -> Option<PlotConfig>,
{
    let root_area = BitMapBackend::new(output_filename, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        root_name,
        (10, 10),
        ("sans-serif", FONT_SIZE_MAIN_TITLE).into_font().color(&BLACK),
    ))?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let sub_plot_areas = margined_root_area.split_evenly((panel_names.len().max(1), 1));
    let mut any_panel_plotted = false;

    for (panel_index, (area, panel_name)) in sub_plot_areas.iter().zip(panel_names).enumerate() {
        match get_panel_config(panel_index) {
            Some(plot_config) if plot_config.has_data() && plot_config.valid_ranges() => {
                draw_single_chart(area, &plot_config)?;
                any_panel_plotted = true;
            }
            Some(plot_config) => {
                let reason = if !plot_config.has_data() {
                    "No data points"
                } else {
                    "Invalid ranges"
                };
                draw_unavailable_message(area, panel_name, plot_type_name, reason)?;
            }
            None => {
                draw_unavailable_message(area, panel_name, plot_type_name, "Calculation/Data Extraction Failed")?;
            }
        }
    }

    root_area.present()?;
    if any_panel_plotted {
        println!("  Stacked plot saved as '{output_filename}'.");
    } else {
        println!("  '{output_filename}' saved with placeholder messages only: no panel had data to plot.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_range_pads_and_orders() {
        let (lo, hi) = calculate_range(10.0, 0.0);
        assert!((lo + 1.5).abs() < 1e-12);
        assert!((hi - 11.5).abs() < 1e-12);
        assert_eq!(calculate_range(3.0, 3.0), (2.5, 3.5));
    }

    #[test]
    fn test_step_post_holds_values() {
        let out = step_post(&[(0.0, 1.0), (1.0, 2.0), (3.0, 5.0)]);
        assert_eq!(out, vec![(0.0, 1.0), (1.0, 1.0), (1.0, 2.0), (3.0, 2.0), (3.0, 5.0)]);
        assert!(step_post(&[]).is_empty());
    }

    #[test]
    fn test_sampled_series_limits_points() {
        let time: Vec<f64> = (0..1000).map(f64::from).collect();
        let series = sampled_series(&time, &time, 100);
        assert_eq!(series.len(), 100);
        assert_eq!(series[1], (10.0, 10.0));
        assert_eq!(sampled_series(&time[..5], &time, 100).len(), 5);
    }

    #[test]
    fn test_finite_bounds_skips_non_finite() {
        assert_eq!(finite_bounds(vec![3.0, f64::NAN, -1.0, f64::INFINITY]), Some((-1.0, 3.0)));
        assert_eq!(finite_bounds(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_palette_spans_viridis() {
        let rgb = |c: RGBColor| (c.0, c.1, c.2);
        assert_eq!(rgb(palette_color(0, 6)), (68, 1, 84));
        assert_ne!(rgb(palette_color(0, 6)), rgb(palette_color(5, 6)));
        assert_eq!(rgb(palette_color(9, 6)), rgb(palette_color(5, 6)));
    }

    #[test]
    fn test_series_ranges_cover_all_series() {
        let series = vec![
            PlotSeries::line(vec![(0.0, 10.0), (1.0, 20.0)], "a", RED, 1),
            PlotSeries::line(vec![(2.0, 0.0)], "b", BLACK, 1),
        ];
        let (x, y) = series_ranges(&series).unwrap();
        assert_eq!(x, 0.0..2.0);
        assert!(y.start < 0.0 && y.end > 20.0);
    }
}
