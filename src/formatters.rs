use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{AlertFeature, Document, ForecastPeriod, Region, Temperature};

/// Number of forecast periods included in a summary
const SUMMARY_PERIODS: usize = 6;

/// Formats an alerts document into a human-readable summary
pub fn format_alerts(region: &Region, document: &Document) -> String {
    let features = entries(document.get("features"));

    if features.is_empty() {
        return format!("No active alerts for {}.", region.as_str());
    }

    let mut output = format!("Active alerts for {}:\n\n", region.as_str());
    for (i, feature) in features.iter().enumerate() {
        let Some(AlertFeature { properties: props }) = decode::<AlertFeature>("alert", feature)
        else {
            output.push_str(&format!("Alert {}:\n  (unrecognized alert entry)\n\n", i + 1));
            continue;
        };
        output.push_str(&format!(
            "Alert {}:\n  Event: {}\n  Severity: {}\n  Area: {}\n",
            i + 1,
            or_unknown(&props.event),
            or_unknown(&props.severity),
            or_unknown(&props.area_desc),
        ));
        if let Some(headline) = &props.headline {
            output.push_str(&format!("  Headline: {}\n", headline));
        }
        output.push('\n');
    }
    output
}

/// Formats a forecast document into a human-readable summary
pub fn format_forecast(latitude: f64, longitude: f64, document: &Document) -> String {
    let periods = entries(document.pointer("/properties/periods"));

    if periods.is_empty() {
        return format!("No forecast periods available for {latitude}, {longitude}.");
    }

    let mut output = format!("Forecast for {latitude}, {longitude}:\n\n");
    for (i, period) in periods.iter().take(SUMMARY_PERIODS).enumerate() {
        let Some(period) = decode::<ForecastPeriod>("forecast period", period) else {
            output.push_str(&format!("Period {}:\n  (unrecognized forecast entry)\n\n", i + 1));
            continue;
        };

        output.push_str(&format!(
            "{}:\n  Temperature: {}\n  Wind: {} {}\n  Conditions: {}\n\n",
            or_unknown(&period.name),
            temperature(&period),
            or_unknown(&period.wind_speed),
            period.wind_direction.as_deref().unwrap_or(""),
            or_unknown(&period.short_forecast),
        ));
    }
    output
}

fn entries(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn decode<T: DeserializeOwned>(what: &str, entry: &Value) -> Option<T> {
    serde_json::from_value(entry.clone())
        .inspect_err(|e| tracing::debug!(error = %e, "Skipping unrecognized {what} in summary"))
        .ok()
}

fn temperature(period: &ForecastPeriod) -> String {
    match &period.temperature {
        Some(Temperature::Plain(t)) => {
            format!("{}\u{00b0}{}", t, period.temperature_unit.as_deref().unwrap_or("F"))
        }
        Some(Temperature::Quantity {
            value: Some(v),
            unit_code,
        }) => {
            // wmoUnit:degC -> C
            let unit = unit_code
                .as_deref()
                .map(|code| code.rsplit(':').next().unwrap_or(code))
                .map(|u| u.strip_prefix("deg").unwrap_or(u))
                .or(period.temperature_unit.as_deref())
                .unwrap_or("");
            format!("{}\u{00b0}{}", v, unit)
        }
        _ => "Unknown".to_string(),
    }
}

fn or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("Unknown")
}
