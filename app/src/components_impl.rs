//! Business logic extracted from Leptos components for testability.
//!
//! Pure functions only: selection handling, details lines and the bar
//! chart geometry rendered as SVG by the dashboard.

use crate::projection::{ChartBar, RegionRow};

pub const CHART_WIDTH: f64 = 720.0;
pub const CHART_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 24.0;
/// Room under the axis for the rotated category labels.
const MARGIN_BOTTOM: f64 = 96.0;
const BAR_FILL_RATIO: f64 = 0.6;

pub const BAR_COLOR: &str = "#FF6F61";
pub const PLACEHOLDER_TITLE: &str = "Select a city to view health data.";

// === Selection ===

/// Map the `<select>` value to a selection; the placeholder option is empty.
pub fn selection_from_value(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn chart_title(region: &str) -> String {
    format!("Health Metrics for {region}")
}

// === Details Panel ===

/// Label/value lines for the details panel, in field order.
pub fn detail_lines(row: &RegionRow) -> Vec<(String, String)> {
    row.values
        .iter()
        .map(|(field, value)| (field.label().to_string(), value.to_string()))
        .collect()
}

// === Bar Chart ===

#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    pub label: String,
    pub value_text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BarGeometry {
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Y coordinate of the value axis baseline.
pub const fn baseline_y() -> f64 {
    CHART_HEIGHT - MARGIN_BOTTOM
}

/// Horizontal extent of the value axis; bars are laid out inside it.
pub const fn axis_span() -> (f64, f64) {
    (MARGIN_LEFT, CHART_WIDTH - MARGIN_RIGHT)
}

/// Largest value on the axis; never zero so all-zero charts still draw.
pub fn axis_max(bars: &[ChartBar]) -> f64 {
    let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    if max > 0.0 { max } else { 1.0 }
}

/// Lay bars out left to right. Negative values are clamped to the baseline.
pub fn bar_layout(bars: &[ChartBar]) -> Vec<BarGeometry> {
    if bars.is_empty() {
        return Vec::new();
    }

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = baseline_y() - MARGIN_TOP;
    let slot = plot_width / bars.len() as f64;
    let width = slot * BAR_FILL_RATIO;
    let max = axis_max(bars);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let height = (bar.value.max(0.0) / max) * plot_height;
            BarGeometry {
                label: bar.label.clone(),
                value_text: format_value(bar.value),
                x: MARGIN_LEFT + slot * i as f64 + (slot - width) / 2.0,
                y: baseline_y() - height,
                width,
                height,
            }
        })
        .collect()
}

/// Whole numbers without a decimal point, others to two places.
pub fn format_value(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// SVG numbers are written with one decimal.
pub fn svg_num(value: f64) -> String {
    format!("{value:.1}")
}
