//! Read-only projections of the record store for the dashboard.
//!
//! Rows carry stored values untouched for textual display. Numeric coercion
//! happens only when a chart is built, and fails loudly on values such as
//! `"N/A"` instead of charting them as zero.

use crate::error::{Result, RiskError};
use crate::types::{Coordinates, Field, FieldValue, RegionRecord, Records};
use serde::{Deserialize, Serialize};

/// One region as shown in the details panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionRow {
    pub name: String,
    pub coordinates: Option<Coordinates>,
    /// Every field in [`Field::ALL`] order.
    pub values: Vec<(Field, FieldValue)>,
}

impl RegionRow {
    pub fn from_record(name: &str, record: &RegionRecord) -> Self {
        Self {
            name: name.to_string(),
            coordinates: record.coordinates,
            values: record
                .fields()
                .map(|(field, value)| (field, value.clone()))
                .collect(),
        }
    }

    pub fn value(&self, field: Field) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, value)| value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
}

/// Everything the dashboard shows for the selected region.
///
/// A chart that cannot be built (a metric still `"N/A"`, or free text set
/// through the bot) is reported in `chart_error` next to the textual details.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionDetails {
    pub row: RegionRow,
    pub chart: Vec<ChartBar>,
    pub chart_error: Option<String>,
}

impl RegionDetails {
    pub fn from_row(row: RegionRow) -> Self {
        match chart_series(&row) {
            Ok(chart) => Self {
                row,
                chart,
                chart_error: None,
            },
            Err(e) => Self {
                row,
                chart: Vec::new(),
                chart_error: Some(e.to_string()),
            },
        }
    }
}

/// One row per region, in store order.
pub fn project(records: &Records) -> Vec<RegionRow> {
    records
        .iter()
        .map(|(name, record)| RegionRow::from_record(name, record))
        .collect()
}

/// Coerce a stored value for charting.
///
/// Counts parse as integers. Everything else drops a trailing `%` and
/// parses as a float.
pub fn to_numeric(field: Field, value: &FieldValue) -> Result<f64> {
    let not_numeric = || RiskError::NotNumeric {
        field: field.label().to_string(),
        value: value.to_string(),
    };

    let parsed = match value {
        FieldValue::Number(n) if field.is_integer() => {
            n.as_i64().map(|i| i as f64).or_else(|| n.as_f64().map(f64::trunc))
        }
        FieldValue::Number(n) => n.as_f64(),
        FieldValue::Text(s) if field.is_integer() => s.trim().parse::<i64>().ok().map(|i| i as f64),
        FieldValue::Text(s) => {
            let s = s.trim();
            s.strip_suffix('%').unwrap_or(s).trim().parse::<f64>().ok()
        }
        FieldValue::Other(_) => None,
    };

    parsed.filter(|v| v.is_finite()).ok_or_else(not_numeric)
}

/// Bar chart series for a region: the six metrics in display order.
pub fn chart_series(row: &RegionRow) -> Result<Vec<ChartBar>> {
    Field::METRICS
        .into_iter()
        .filter_map(|field| field.chart_label().map(|label| (field, label)))
        .map(|(field, label)| {
            let value = row.value(field).cloned().unwrap_or_default();
            Ok(ChartBar {
                label: label.to_string(),
                value: to_numeric(field, &value)?,
            })
        })
        .collect()
}
