use std::fmt;

#[derive(Debug)]
pub enum RiskError {
    #[cfg(feature = "ssr")]
    Http(reqwest::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(String),
    InvalidResponse(String),
    Telegram(String),
    RegionExists(String),
    RegionNotFound(String),
    UnknownField { region: String, field: String },
    GeocodeFailed(String),
    MapUnavailable,
    NotNumeric { field: String, value: String },
}

impl RiskError {
    /// Failures caused by the operator's input rather than the system.
    ///
    /// These are answered with their message and leave the store untouched.
    /// Everything else aborts the in-flight command.
    pub const fn is_operator_error(&self) -> bool {
        matches!(
            self,
            Self::RegionExists(_)
                | Self::RegionNotFound(_)
                | Self::UnknownField { .. }
                | Self::GeocodeFailed(_)
                | Self::MapUnavailable
        )
    }
}

impl fmt::Display for RiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "ssr")]
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
            Self::Telegram(msg) => write!(f, "Telegram API error: {msg}"),
            Self::RegionExists(name) => write!(f, "{name} is already in the system."),
            Self::RegionNotFound(name) => write!(f, "{name} is not in the system."),
            Self::UnknownField { region, field } => {
                write!(f, "Parameter '{field}' not found for {region}.")
            }
            Self::GeocodeFailed(name) => write!(f, "Could not find coordinates for {name}."),
            Self::MapUnavailable => write!(f, "No map available. Please update the data first."),
            Self::NotNumeric { field, value } => {
                write!(f, "{field} value '{value}' is not numeric")
            }
        }
    }
}

impl std::error::Error for RiskError {}

#[cfg(feature = "ssr")]
impl From<reqwest::Error> for RiskError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<std::io::Error> for RiskError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for RiskError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, RiskError>;
