use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::error::ResolveError;
use crate::models::{Document, ForecastQuery};
use crate::resolver::WeatherResolver;

/// REST routes over the shared weather resolver
pub fn router(resolver: WeatherResolver) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/alerts/{region}", get(alerts))
        .route("/forecast", get(forecast))
        .with_state(resolver)
}

/// Resolver error rendered as a JSON error envelope
pub struct ApiError(ResolveError);

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ResolveError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ResolveError::UpstreamUnavailable { .. } | ResolveError::UpstreamShapeMismatch { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };
        let body = json!({
            "error": self.0.kind(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn alerts(
    State(resolver): State<WeatherResolver>,
    Path(region): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let document = resolver.resolve_alerts(&region).await.inspect_err(|e| {
        tracing::warn!(%region, error = %e, "GET /alerts failed");
    })?;
    Ok(Json(document))
}

async fn forecast(
    State(resolver): State<WeatherResolver>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<Document>, ApiError> {
    let (Some(latitude), Some(longitude)) = (query.latitude.as_deref(), query.longitude.as_deref())
    else {
        return Err(ResolveError::InvalidArgument(
            "latitude and longitude query parameters are required".to_string(),
        )
        .into());
    };
    let latitude = parse_number("latitude", latitude)?;
    let longitude = parse_number("longitude", longitude)?;

    let document = resolver
        .resolve_forecast(latitude, longitude)
        .await
        .inspect_err(|e| {
            tracing::warn!(latitude, longitude, error = %e, "GET /forecast failed");
        })?;
    Ok(Json(document))
}

fn parse_number(name: &str, raw: &str) -> Result<f64, ApiError> {
    raw.trim().parse::<f64>().map_err(|_| {
        ResolveError::InvalidArgument(format!("{name} must be a number, got {raw:?}")).into()
    })
}
