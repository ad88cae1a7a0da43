use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_DATA_YET: &str = "No data yet";

#[allow(clippy::expect_used)]
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("separator pattern is valid"));

/// Canonical form used to match operator-typed field names:
/// lower-cased, runs of spaces/underscores collapsed to a single `_`.
pub fn normalize_field_name(name: &str) -> String {
    SEPARATORS
        .replace_all(name.trim().to_lowercase().as_str(), "_")
        .trim_matches('_')
        .to_string()
}

/// The seven mutable attributes of a region record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    RiskLevel,
    CancerPercentage,
    ChronicIllnessPercentage,
    MortalityRate,
    NumberOfHospitals,
    CancerCareCenters,
    HealthInsuranceCoverage,
}

impl Field {
    pub const ALL: [Self; 7] = [
        Self::RiskLevel,
        Self::CancerPercentage,
        Self::ChronicIllnessPercentage,
        Self::MortalityRate,
        Self::NumberOfHospitals,
        Self::CancerCareCenters,
        Self::HealthInsuranceCoverage,
    ];

    pub const METRICS: [Self; 6] = [
        Self::CancerPercentage,
        Self::ChronicIllnessPercentage,
        Self::MortalityRate,
        Self::NumberOfHospitals,
        Self::CancerCareCenters,
        Self::HealthInsuranceCoverage,
    ];

    /// Key under which the field is persisted.
    pub const fn key(self) -> &'static str {
        match self {
            Self::RiskLevel => "Risk_level",
            Self::CancerPercentage => "Cancer Percentage",
            Self::ChronicIllnessPercentage => "Chronic Illness Percentage",
            Self::MortalityRate => "Mortality Rate",
            Self::NumberOfHospitals => "Number of Hospitals",
            Self::CancerCareCenters => "Cancer Care Centers",
            Self::HealthInsuranceCoverage => "Health Insurance Coverage",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RiskLevel => "Risk Level",
            other => other.key(),
        }
    }

    /// Axis label on the dashboard bar chart. Risk level is not charted.
    pub const fn chart_label(self) -> Option<&'static str> {
        match self {
            Self::RiskLevel => None,
            Self::CancerPercentage => Some("Cancer %"),
            Self::ChronicIllnessPercentage => Some("Chronic Illness %"),
            Self::MortalityRate => Some("Mortality Rate"),
            Self::NumberOfHospitals => Some("Hospitals"),
            Self::CancerCareCenters => Some("Care Centers"),
            Self::HealthInsuranceCoverage => Some("Insurance %"),
        }
    }

    /// Counts are charted as integers, everything else as floats.
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::NumberOfHospitals | Self::CancerCareCenters)
    }

    /// Resolve an operator-typed name, ignoring case and space/underscore differences.
    pub fn lookup(name: &str) -> Option<Self> {
        let wanted = normalize_field_name(name);
        if wanted.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|field| normalize_field_name(field.key()) == wanted)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stored attribute value. Files written by hand may hold plain JSON
/// numbers or anything else (`null`, booleans); the bot always writes
/// strings. Unusual values are kept verbatim so a save never rewrites them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) | Self::Other(_) => None,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::text(NOT_AVAILABLE)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

/// Latitude/longitude in degrees, persisted as a `[lat, lon]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.latitude, c.longitude]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?}]", self.latitude, self.longitude)
    }
}

/// Coarse risk category used to color map markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Low Risk" => Some(Self::Low),
            "Moderate Risk" => Some(Self::Moderate),
            "High Risk" => Some(Self::High),
            _ => None,
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Moderate => "orange",
            Self::High => "red",
        }
    }
}

pub const DEFAULT_MARKER_COLOR: &str = "blue";

/// Marker color for a stored risk level; unrecognised tiers get the default.
pub fn marker_color(risk_level: &FieldValue) -> &'static str {
    risk_level
        .as_text()
        .and_then(RiskTier::from_label)
        .map_or(DEFAULT_MARKER_COLOR, RiskTier::color)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(rename = "Risk_level", default)]
    pub risk_level: FieldValue,
    #[serde(rename = "Cancer Percentage", default)]
    pub cancer_percentage: FieldValue,
    #[serde(rename = "Chronic Illness Percentage", default)]
    pub chronic_illness_percentage: FieldValue,
    #[serde(rename = "Mortality Rate", default)]
    pub mortality_rate: FieldValue,
    #[serde(rename = "Number of Hospitals", default)]
    pub number_of_hospitals: FieldValue,
    #[serde(rename = "Cancer Care Centers", default)]
    pub cancer_care_centers: FieldValue,
    #[serde(rename = "Health Insurance Coverage", default)]
    pub health_insurance_coverage: FieldValue,
    /// Keys this program does not know about, kept so saving never drops them.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RegionRecord {
    /// Default template for a freshly added region.
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates: Some(coordinates),
            risk_level: FieldValue::text(NO_DATA_YET),
            cancer_percentage: FieldValue::default(),
            chronic_illness_percentage: FieldValue::default(),
            mortality_rate: FieldValue::default(),
            number_of_hospitals: FieldValue::default(),
            cancer_care_centers: FieldValue::default(),
            health_insurance_coverage: FieldValue::default(),
            extra: serde_json::Map::new(),
        }
    }

    pub const fn get(&self, field: Field) -> &FieldValue {
        match field {
            Field::RiskLevel => &self.risk_level,
            Field::CancerPercentage => &self.cancer_percentage,
            Field::ChronicIllnessPercentage => &self.chronic_illness_percentage,
            Field::MortalityRate => &self.mortality_rate,
            Field::NumberOfHospitals => &self.number_of_hospitals,
            Field::CancerCareCenters => &self.cancer_care_centers,
            Field::HealthInsuranceCoverage => &self.health_insurance_coverage,
        }
    }

    /// Overwrite one field, returning the previous value.
    pub fn set(&mut self, field: Field, value: FieldValue) -> FieldValue {
        let slot = match field {
            Field::RiskLevel => &mut self.risk_level,
            Field::CancerPercentage => &mut self.cancer_percentage,
            Field::ChronicIllnessPercentage => &mut self.chronic_illness_percentage,
            Field::MortalityRate => &mut self.mortality_rate,
            Field::NumberOfHospitals => &mut self.number_of_hospitals,
            Field::CancerCareCenters => &mut self.cancer_care_centers,
            Field::HealthInsuranceCoverage => &mut self.health_insurance_coverage,
        };
        std::mem::replace(slot, value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        Field::ALL.into_iter().map(move |field| (field, self.get(field)))
    }
}

/// Region name to record, in the order regions were added.
pub type Records = IndexMap<String, RegionRecord>;
