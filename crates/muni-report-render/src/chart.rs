//! Hand-rolled chart geometry.
//!
//! Two stateless generators turn `{name, value}` series into drawable
//! primitives: pie-slice polygons with legend rows, and bar rectangles with
//! axis lines and labels. No charting library, no canvas; callers place the
//! output into the document through the layout engine.

use muni_report::aggregate::{percentage, series_total, SeriesPoint};

use crate::render_ir::{Color, LineCommand, CHART_PALETTE};

/// Minimum polygon vertices along any slice arc.
pub const PIE_MIN_ARC_VERTICES: usize = 16;
/// Arc vertices a full 360° slice would receive.
pub const PIE_FULL_CIRCLE_VERTICES: usize = 48;
/// Vertical step between legend rows.
pub const LEGEND_ROW_STEP: f32 = 6.0;
/// Gap between the circle and the legend column.
pub const LEGEND_GAP: f32 = 8.0;
/// Legend color-swatch edge length.
pub const LEGEND_SWATCH: f32 = 3.0;
/// Bar category labels longer than this are truncated with an ellipsis.
pub const BAR_NAME_MAX_CHARS: usize = 8;

/// One pie wedge: filled polygon plus its legend row.
///
/// A zero-span slice carries an empty polygon but still occupies a legend
/// row and still advanced the start angle when it was generated.
#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    pub name: String,
    pub value: f64,
    /// Angular span in degrees.
    pub span_deg: f64,
    /// Fan polygon: center vertex plus arc vertices. Empty when span is 0.
    pub polygon: Vec<(f32, f32)>,
    pub color: Color,
    pub legend: LegendEntry,
}

/// Legend row to the right of the circle.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    /// Swatch left edge.
    pub x: f32,
    /// Swatch top edge.
    pub y: f32,
    pub color: Color,
    /// `name: value (percentage%)`.
    pub label: String,
}

/// Generate pie-slice polygons and legend rows.
///
/// Slices start at −90° (12 o'clock) and proceed clockwise, each spanning
/// `value / total · 360°`. Returns an empty list when the series total is
/// zero; that is a caller-renders-nothing outcome, not an error.
pub fn pie_slices(series: &[SeriesPoint], center: (f32, f32), radius: f32) -> Vec<Slice> {
    let total = series_total(series);
    if total <= 0.0 {
        return Vec::new();
    }

    let legend_x = center.0 + radius + LEGEND_GAP;
    let legend_top = center.1 - radius;
    let mut start_deg = -90.0f64;

    series
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let span_deg = point.value / total * 360.0;
            let color = CHART_PALETTE[i % CHART_PALETTE.len()];
            let polygon = if span_deg > 0.0 {
                fan_polygon(center, radius, start_deg, span_deg)
            } else {
                Vec::new()
            };
            start_deg += span_deg;
            Slice {
                name: point.name.clone(),
                value: point.value,
                span_deg,
                polygon,
                color,
                legend: LegendEntry {
                    x: legend_x,
                    y: legend_top + i as f32 * LEGEND_ROW_STEP,
                    color,
                    label: format!(
                        "{}: {} ({:.1}%)",
                        point.name,
                        format_value(point.value),
                        percentage(point.value, total)
                    ),
                },
            }
        })
        .collect()
}

/// Fan polygon for one wedge: the center vertex plus arc vertices at a
/// resolution proportional to the span, floored so small slices stay smooth.
fn fan_polygon(center: (f32, f32), radius: f32, start_deg: f64, span_deg: f64) -> Vec<(f32, f32)> {
    let segments = ((span_deg / 360.0) * PIE_FULL_CIRCLE_VERTICES as f64).ceil() as usize;
    let segments = segments.max(PIE_MIN_ARC_VERTICES);
    let mut points = Vec::with_capacity(segments + 2);
    points.push(center);
    for i in 0..=segments {
        let angle = (start_deg + span_deg * i as f64 / segments as f64).to_radians();
        points.push((
            center.0 + radius * angle.cos() as f32,
            center.1 + radius * angle.sin() as f32,
        ));
    }
    points
}

/// Label placed relative to a bar.
#[derive(Clone, Debug, PartialEq)]
pub struct BarLabel {
    /// Anchor x (bar center).
    pub x: f32,
    /// Baseline y.
    pub y: f32,
    pub text: String,
}

/// One bar: rectangle geometry plus its value and category labels.
#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    /// Literal numeric value above the bar.
    pub value_label: BarLabel,
    /// Category name below the axis, truncated past
    /// [`BAR_NAME_MAX_CHARS`].
    pub name_label: BarLabel,
}

/// Bar chart geometry: per-bar rectangles and the two axis lines.
#[derive(Clone, Debug, PartialEq)]
pub struct BarGeometry {
    pub bars: Vec<Bar>,
    pub x_axis: LineCommand,
    pub y_axis: LineCommand,
}

/// Generate bar geometry within the `width` × `height` box at `origin`
/// (top-left). Returns `None` for an empty series.
///
/// The value scale divides by `max(values)` floored at 1, so an all-zero
/// series produces zero-height bars instead of a division by zero.
pub fn bar_geometry(
    series: &[SeriesPoint],
    origin: (f32, f32),
    width: f32,
    height: f32,
) -> Option<BarGeometry> {
    if series.is_empty() {
        return None;
    }

    let baseline = origin.1 + height;
    let max = series.iter().map(|p| p.value).fold(1.0f64, f64::max);
    let slot = width / series.len() as f32;
    let bar_width = slot * 0.6;

    let bars = series
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let bar_height = (point.value / max) as f32 * height;
            let x = origin.0 + i as f32 * slot + slot * 0.2;
            let center = x + bar_width / 2.0;
            Bar {
                x,
                y: baseline - bar_height,
                width: bar_width,
                height: bar_height,
                color: CHART_PALETTE[i % CHART_PALETTE.len()],
                value_label: BarLabel {
                    x: center,
                    y: baseline - bar_height - 1.5,
                    text: format_value(point.value),
                },
                name_label: BarLabel {
                    x: center,
                    y: baseline + 4.0,
                    text: truncate_name(&point.name),
                },
            }
        })
        .collect();

    let axis = |x1, y1, x2, y2| LineCommand {
        x1,
        y1,
        x2,
        y2,
        color: Color::BLACK,
        width: 0.4,
    };
    Some(BarGeometry {
        bars,
        x_axis: axis(origin.0, baseline, origin.0 + width, baseline),
        y_axis: axis(origin.0, origin.1, origin.0, baseline),
    })
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() > BAR_NAME_MAX_CHARS {
        let mut out: String = name.chars().take(BAR_NAME_MAX_CHARS).collect();
        out.push('…');
        out
    } else {
        name.to_string()
    }
}

/// Integral values print without a decimal point.
pub(crate) fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(&str, f64)]) -> Vec<SeriesPoint> {
        points
            .iter()
            .map(|(name, value)| SeriesPoint::new(*name, *value))
            .collect()
    }

    const CENTER: (f32, f32) = (50.0, 50.0);

    #[test]
    fn slice_spans_cover_the_full_circle() {
        let slices = pie_slices(
            &series(&[("A", 3.0), ("B", 4.0), ("C", 0.0), ("D", 1.0)]),
            CENTER,
            20.0,
        );
        let span_sum: f64 = slices.iter().map(|s| s.span_deg).sum();
        assert!((span_sum - 360.0).abs() < 1e-9);
    }

    #[test]
    fn empty_or_all_zero_series_produce_no_slices() {
        assert!(pie_slices(&[], CENTER, 20.0).is_empty());
        assert!(pie_slices(&series(&[("A", 0.0)]), CENTER, 20.0).is_empty());
    }

    #[test]
    fn zero_span_slice_advances_angle_without_polygon() {
        let slices = pie_slices(&series(&[("A", 1.0), ("B", 0.0), ("C", 1.0)]), CENTER, 20.0);
        assert!(slices[1].polygon.is_empty());
        assert_eq!(slices[1].legend.label, "B: 0 (0.0%)");
        // C begins exactly where A ended: 12 o'clock + 180°, i.e. pointing
        // straight down from the center.
        let first_arc_vertex = slices[2].polygon[1];
        assert!((first_arc_vertex.0 - CENTER.0).abs() < 1e-3);
        assert!((first_arc_vertex.1 - (CENTER.1 + 20.0)).abs() < 1e-3);
    }

    #[test]
    fn small_slices_keep_the_minimum_arc_resolution() {
        let slices = pie_slices(&series(&[("A", 1.0), ("B", 99.0)]), CENTER, 20.0);
        // center + (segments + 1) arc vertices
        assert_eq!(slices[0].polygon.len(), PIE_MIN_ARC_VERTICES + 2);
        assert!(slices[1].polygon.len() > slices[0].polygon.len());
    }

    #[test]
    fn palette_cycles_by_slice_index() {
        let slices = pie_slices(
            &series(&[
                ("a", 1.0),
                ("b", 1.0),
                ("c", 1.0),
                ("d", 1.0),
                ("e", 1.0),
                ("f", 1.0),
                ("g", 1.0),
            ]),
            CENTER,
            20.0,
        );
        assert_eq!(slices[6].color, slices[0].color);
        assert_ne!(slices[1].color, slices[0].color);
    }

    #[test]
    fn legend_rows_step_down_a_fixed_amount() {
        let slices = pie_slices(&series(&[("A", 1.0), ("B", 1.0)]), CENTER, 20.0);
        assert_eq!(slices[0].legend.x, slices[1].legend.x);
        let step = slices[1].legend.y - slices[0].legend.y;
        assert!((step - LEGEND_ROW_STEP).abs() < 1e-6);
    }

    #[test]
    fn tallest_bar_fills_the_chart_height() {
        let geometry =
            bar_geometry(&series(&[("A", 2.0), ("B", 8.0)]), (10.0, 10.0), 80.0, 40.0).unwrap();
        assert!((geometry.bars[1].height - 40.0).abs() < 1e-6);
        assert!((geometry.bars[0].height - 10.0).abs() < 1e-6);
        // Bars grow upward from the shared baseline.
        let baseline = geometry.x_axis.y1;
        assert!((geometry.bars[1].y + geometry.bars[1].height - baseline).abs() < 1e-6);
    }

    #[test]
    fn all_zero_bars_use_the_unit_floor() {
        let geometry = bar_geometry(&series(&[("A", 0.0)]), (0.0, 0.0), 60.0, 30.0).unwrap();
        assert_eq!(geometry.bars[0].height, 0.0);
        assert!(bar_geometry(&[], (0.0, 0.0), 60.0, 30.0).is_none());
    }

    #[test]
    fn bar_width_takes_sixty_percent_of_the_slot() {
        let geometry = bar_geometry(
            &series(&[("A", 1.0), ("B", 1.0), ("C", 1.0), ("D", 1.0)]),
            (0.0, 0.0),
            100.0,
            30.0,
        )
        .unwrap();
        assert!((geometry.bars[0].width - 15.0).abs() < 1e-6);
        // Centered within the slot: 20% margin each side.
        assert!((geometry.bars[1].x - 30.0).abs() < 1e-6);
    }

    #[test]
    fn long_category_names_truncate_with_ellipsis() {
        let geometry = bar_geometry(
            &series(&[("Barangay Clearance", 1.0)]),
            (0.0, 0.0),
            50.0,
            20.0,
        )
        .unwrap();
        assert_eq!(geometry.bars[0].name_label.text, "Barangay…");
        assert_eq!(geometry.bars[0].value_label.text, "1");
    }
}
