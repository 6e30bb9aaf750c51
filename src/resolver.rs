use std::sync::Arc;

use reqwest::Url;

use crate::error::{ResolveError, UpstreamFailure};
use crate::models::{Coordinate, Document, GridReference, Region};
use crate::upstream::Upstream;

/// Turns alert and forecast requests into upstream fetches.
///
/// Built once at startup and shared by the REST and MCP surfaces. Holds no
/// mutable state, so concurrent calls need no coordination.
#[derive(Clone)]
pub struct WeatherResolver {
    upstream: Arc<dyn Upstream>,
    base_url: String,
}

impl WeatherResolver {
    pub fn new(upstream: Arc<dyn Upstream>, base_url: impl Into<String>) -> Self {
        Self {
            upstream,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Active alerts for a two-letter region, in any case
    pub async fn resolve_alerts(&self, region: &str) -> Result<Document, ResolveError> {
        let region = Region::parse(region)?;
        let url = self.alerts_url(&region)?;

        tracing::info!(region = region.as_str(), "Resolving alerts");
        self.upstream.fetch(url.as_str()).await
    }

    fn alerts_url(&self, region: &Region) -> Result<Url, ResolveError> {
        let endpoint = format!("{}/alerts/active", self.base_url);
        Url::parse_with_params(&endpoint, [("area", region.as_str())]).map_err(|e| {
            ResolveError::unavailable(&endpoint, UpstreamFailure::Transport(e.to_string()))
        })
    }

    /// Forecast for a coordinate: points lookup, then the forecast locator it names
    pub async fn resolve_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Document, ResolveError> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        tracing::info!(
            latitude = coordinate.latitude(),
            longitude = coordinate.longitude(),
            "Resolving forecast"
        );

        let grid = self.resolve_grid(&coordinate).await?;
        self.upstream.fetch(&grid.forecast_url).await
    }

    async fn resolve_grid(&self, coordinate: &Coordinate) -> Result<GridReference, ResolveError> {
        let points_url = format!("{}/points/{}", self.base_url, coordinate.grid_key());
        let points = self.upstream.fetch(&points_url).await?;

        GridReference::from_points(&points).ok_or_else(|| {
            tracing::warn!(url = %points_url, "Points response has no forecast locator");
            ResolveError::UpstreamShapeMismatch {
                field: GridReference::FORECAST_FIELD,
            }
        })
    }
}
