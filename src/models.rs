use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Raw upstream JSON payload, handed back to callers unchanged
pub type Document = serde_json::Value;

// ============================================================================
// Resolver Inputs
// ============================================================================

/// Two-character US state or territory code, uppercased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region(String);

impl Region {
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        if raw.chars().count() != 2 {
            return Err(ResolveError::InvalidArgument(format!(
                "state must be a two-letter code, got {raw:?}"
            )));
        }
        Ok(Self(raw.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Latitude/longitude pair in decimal degrees, range-checked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ResolveError> {
        // NaN fails both comparisons
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ResolveError::InvalidArgument(format!(
                "latitude must be between -90 and 90, got {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ResolveError::InvalidArgument(format!(
                "longitude must be between -180 and 180, got {longitude}"
            )));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// `lat,lon` with four decimal places, as the points lookup expects
    pub fn grid_key(&self) -> String {
        format!("{},{}", degrees(self.latitude), degrees(self.longitude))
    }
}

/// Four-decimal rendering of a degree value; values that round to zero are unsigned
pub fn degrees(value: f64) -> String {
    let text = format!("{value:.4}");
    match text.strip_prefix('-') {
        Some(magnitude) if magnitude.chars().all(|c| c == '0' || c == '.') => magnitude.to_string(),
        _ => text,
    }
}

/// Forecast locator pulled out of a points lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridReference {
    pub forecast_url: String,
}

impl GridReference {
    pub const FORECAST_FIELD: &'static str = "properties.forecast";

    pub fn from_points(points: &Document) -> Option<Self> {
        points
            .pointer("/properties/forecast")
            .and_then(|v| v.as_str())
            .map(|url| Self {
                forecast_url: url.to_string(),
            })
    }
}

// ============================================================================
// National Weather Service Summary Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AlertFeature {
    pub properties: AlertProperties,
}

#[derive(Debug, Deserialize)]
pub struct AlertProperties {
    pub event: Option<String>,
    pub headline: Option<String>,
    pub severity: Option<String>,
    #[serde(rename = "areaDesc")]
    pub area_desc: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastPeriod {
    pub name: Option<String>,
    pub temperature: Option<Temperature>,
    #[serde(rename = "temperatureUnit")]
    pub temperature_unit: Option<String>,
    #[serde(rename = "windSpeed")]
    pub wind_speed: Option<String>,
    #[serde(rename = "windDirection")]
    pub wind_direction: Option<String>,
    #[serde(rename = "shortForecast")]
    pub short_forecast: Option<String>,
}

/// Period temperature: a bare number, or a quantitative value object
/// (`{"unitCode": "wmoUnit:degC", "value": 12.2}`)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Temperature {
    Plain(f64),
    Quantity {
        value: Option<f64>,
        #[serde(rename = "unitCode")]
        unit_code: Option<String>,
    },
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetAlertsRequest {
    /// Two-letter US state code (e.g. CA, NY)
    #[schemars(length(min = 2, max = 2))]
    pub state: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetForecastRequest {
    /// Latitude of the location
    #[schemars(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    /// Longitude of the location
    #[schemars(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

// ============================================================================
// REST Query Models
// ============================================================================

/// Raw `/forecast` query; parsed by the handler so missing and malformed
/// values get distinct messages
#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}
