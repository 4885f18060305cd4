/// Core data types for the flood information service.
///
/// This module defines the raw records received from the flood data service
/// and the shared error type. It contains no view logic, only types and the
/// small amount of deserialisation glue the upstream feed requires.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::severity::Severity;

// ---------------------------------------------------------------------------
// Flood records
// ---------------------------------------------------------------------------

/// A current (or recently removed) flood alert or warning for a target area.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Flood {
    pub ta_code: String,
    pub ta_name: String,
    #[serde(default)]
    pub ta_description: Option<String>,
    pub severity_value: Severity,
    #[serde(default)]
    pub situation: String,
    pub situation_changed: DateTime<Utc>,
    /// GeoJSON geometry as stored upstream, i.e. a JSON document in a string.
    #[serde(default)]
    pub geometry: Option<String>,
}

/// The flood list as returned by `/floods` and friends.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FloodFeed {
    #[serde(default)]
    pub floods: Vec<Flood>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Station enumerations
// ---------------------------------------------------------------------------

/// Kind of measuring station, as coded by the flood data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationType {
    #[serde(rename = "S", alias = "s")]
    River,
    /// A river station that reports both an upstream and downstream stage.
    #[serde(rename = "M", alias = "m")]
    Multi,
    #[serde(rename = "C", alias = "c")]
    Coastal,
    #[serde(rename = "G", alias = "g")]
    Groundwater,
    #[serde(rename = "R", alias = "r")]
    Rainfall,
}

/// Which stage of a station a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Qualifier {
    #[default]
    #[serde(rename = "u", alias = "U")]
    Upstream,
    #[serde(rename = "d", alias = "D")]
    Downstream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StationStatus {
    #[default]
    Active,
    Suspended,
    Closed,
    #[serde(other)]
    Unknown,
}

/// Threshold category in the flood warning identification scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FwisType {
    #[serde(rename = "A")]
    Alert,
    #[serde(rename = "W")]
    Warning,
}

// ---------------------------------------------------------------------------
// Station records
// ---------------------------------------------------------------------------

/// Station metadata for one stage of a measuring station.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Station {
    pub rloi_id: i64,
    pub station_type: StationType,
    #[serde(default)]
    pub qualifier: Qualifier,
    pub external_name: String,
    #[serde(default)]
    pub river_name: String,
    #[serde(default)]
    pub agency_name: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub status: StationStatus,
    #[serde(default, deserialize_with = "de::f64_or_zero")]
    pub stage_datum: f64,
    #[serde(default, deserialize_with = "de::opt_f64_lenient")]
    pub subtract: Option<f64>,
    #[serde(default)]
    pub post_process: bool,
    /// Top of the normal range.
    #[serde(default, deserialize_with = "de::opt_f64_lenient")]
    pub percentile_5: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_lenient")]
    pub percentile_95: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_lenient")]
    pub por_max_value: Option<f64>,
    #[serde(default)]
    pub por_max_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub iswales: bool,
    #[serde(default)]
    pub forecast: bool,
}

/// Neighbouring stations on the same river.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RiverNeighbours {
    #[serde(default)]
    pub upstream: Option<NeighbourStation>,
    #[serde(default)]
    pub downstream: Option<NeighbourStation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NeighbourStation {
    pub rloi_id: i64,
    #[serde(default)]
    pub qualifier: Qualifier,
    #[serde(default)]
    pub external_name: String,
}

/// Brief station description used in location listings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationSummary {
    pub rloi_id: i64,
    pub station_type: StationType,
    #[serde(default)]
    pub qualifier: Qualifier,
    pub external_name: String,
    #[serde(default)]
    pub river_name: String,
    #[serde(default)]
    pub status: StationStatus,
}

/// A single telemetry value. The upstream feed names the value field `_`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelemetryReading {
    pub ts: DateTime<Utc>,
    #[serde(rename = "_", deserialize_with = "de::f64_lenient")]
    pub value: f64,
    #[serde(default)]
    pub err: bool,
}

/// A historic flood impact recorded against a station level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Impact {
    #[serde(rename = "impactid")]
    pub impact_id: i64,
    #[serde(deserialize_with = "de::f64_lenient")]
    pub value: f64,
    pub description: String,
    #[serde(rename = "shortname")]
    pub short_name: String,
    #[serde(rename = "telemetryactive", default = "default_true")]
    pub telemetry_active: bool,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Threshold records
// ---------------------------------------------------------------------------

/// A threshold from the IMTD dataset for one station.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImtdThreshold {
    pub fwis_type: FwisType,
    pub threshold_type: String,
    #[serde(deserialize_with = "de::f64_lenient")]
    pub value: f64,
    #[serde(default)]
    pub fwis_code: Option<String>,
    #[serde(default)]
    pub severity_value: Option<u8>,
    #[serde(default)]
    pub ta_name: Option<String>,
}

/// A station threshold row attached to a target area, with latest reading.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetAreaThreshold {
    pub rloi_id: i64,
    pub threshold_type: String,
    #[serde(default)]
    pub status: StationStatus,
    #[serde(default)]
    pub iswales: bool,
    #[serde(default, deserialize_with = "de::opt_f64_lenient")]
    pub latest_level: Option<f64>,
    #[serde(default)]
    pub value_timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_f64_lenient")]
    pub threshold_value: Option<f64>,
    #[serde(default, deserialize_with = "de::f64_or_zero")]
    pub stage_datum: f64,
    #[serde(default, deserialize_with = "de::opt_f64_lenient")]
    pub subtract: Option<f64>,
    #[serde(default)]
    pub post_process: bool,
    pub station_type: StationType,
    #[serde(default)]
    pub qualifier: Qualifier,
    #[serde(default)]
    pub river_name: String,
    #[serde(default)]
    pub external_name: String,
}

// ---------------------------------------------------------------------------
// Areas, places and outlook
// ---------------------------------------------------------------------------

/// Whether a target area receives flood alerts or flood warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetAreaKind {
    Alert,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetArea {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Code of the enclosing alert area, for warning areas that have one.
    #[serde(default)]
    pub parent: Option<String>,
    /// `[lon, lat]`
    #[serde(default)]
    pub centroid: Option<[f64; 2]>,
}

impl TargetArea {
    /// Area codes carry the kind in their fifth character, e.g. `011FWFNC6KB`
    /// is a warning area and `011WAFDW` an alert area.
    pub fn kind(&self) -> TargetAreaKind {
        match self.code.chars().nth(4) {
            Some('W') | Some('w') => TargetAreaKind::Warning,
            _ => TargetAreaKind::Alert,
        }
    }
}

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    pub name: String,
    /// `[lon, lat]`
    pub center: [f64; 2],
    /// `[west, south, east, north]`
    pub bbox: [f64; 4],
    #[serde(default = "default_true")]
    pub is_england: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutlookDay {
    pub date: NaiveDate,
    /// 0 = no data, 1 = very low ... 4 = high
    pub risk_level: u8,
}

/// The five-day flood guidance outlook.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Outlook {
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub days: Vec<OutlookDay>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or shaping flood data.
#[derive(Debug, PartialEq)]
pub enum FloodError {
    /// Non-2xx HTTP response from an upstream service.
    HttpError(u16),
    /// The request could not be sent or the body could not be read.
    RequestError(String),
    /// A response body or record could not be deserialized.
    ParseError(String),
    /// A flood record carried a geometry string that is not valid JSON.
    InvalidGeometry { ta_code: String, message: String },
    /// The configuration file or an environment override was invalid.
    ConfigError(String),
}

impl std::fmt::Display for FloodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloodError::HttpError(code) => write!(f, "HTTP error: {}", code),
            FloodError::RequestError(msg) => write!(f, "Request error: {}", msg),
            FloodError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            FloodError::InvalidGeometry { ta_code, message } => {
                write!(f, "Invalid geometry for target area {}: {}", ta_code, message)
            }
            FloodError::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for FloodError {}

impl From<reqwest::Error> for FloodError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FloodError::HttpError(status.as_u16()),
            None => FloodError::RequestError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for FloodError {
    fn from(err: serde_json::Error) -> Self {
        FloodError::ParseError(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Deserialisation helpers
// ---------------------------------------------------------------------------

/// The flood service serialises `numeric` columns as strings, so numeric
/// fields accept either form.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    pub fn f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        }
    }

    /// Missing and null values read as zero.
    pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_f64_lenient(deserializer)?.unwrap_or(0.0))
    }

    pub fn opt_f64_lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrString::Number(n)) => Ok(Some(n)),
            Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(NumberOrString::Text(s)) => {
                s.trim().parse().map(Some).map_err(serde::de::Error::custom)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
