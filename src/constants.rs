/// National Weather Service API base URL
pub const NWS_API_BASE: &str = "https://api.weather.gov";

/// Media type requested from the upstream for every fetch
pub const GEO_JSON: &str = "application/geo+json";

/// Upstream request timeout applied when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Listen address for the HTTP surfaces
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// URI scheme of the weather resource template
pub const RESOURCE_SCHEME: &str = "weather://";

/// Client tag sent upstream unless overridden
pub fn default_user_agent() -> String {
    format!("weather-gateway/{}", env!("CARGO_PKG_VERSION"))
}
