use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::*,
    service::{RequestContext, RoleServer},
    tool, tool_handler, tool_router, ErrorData as McpError,
};

use crate::constants::RESOURCE_SCHEME;
use crate::error::ResolveError;
use crate::formatters::{format_alerts, format_forecast};
use crate::models::{degrees, Coordinate, Document, GetAlertsRequest, GetForecastRequest, Region};
use crate::resolver::WeatherResolver;

const RESOURCE_TEMPLATE: &str = "weather://{type}/{params}";

/// MCP surface over the shared weather resolver
#[derive(Clone)]
pub struct WeatherServer {
    resolver: WeatherResolver,
    tool_router: ToolRouter<Self>,
}

impl WeatherServer {
    pub fn new(resolver: WeatherResolver) -> Self {
        Self {
            resolver,
            tool_router: Self::tool_router(),
        }
    }

    async fn read_weather_resource(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let resource = WeatherResource::parse(uri).map_err(invalid_params)?;
        tracing::info!(%uri, "Reading weather resource");

        let document = match resource {
            WeatherResource::Alerts(region) => self.resolver.resolve_alerts(region.as_str()).await,
            WeatherResource::Forecast(c) => {
                self.resolver.resolve_forecast(c.latitude(), c.longitude()).await
            }
        }
        .map_err(|e| {
            tracing::error!(%uri, error = %e, "Failed to read weather resource");
            match e {
                ResolveError::InvalidArgument(_) => invalid_params(e),
                other => McpError::internal_error(other.to_string(), None),
            }
        })?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(pretty(&document), uri)],
        })
    }
}

/// Target of a `weather://{type}/{params}` resource URI
#[derive(Debug, PartialEq)]
enum WeatherResource {
    Alerts(Region),
    Forecast(Coordinate),
}

impl WeatherResource {
    fn parse(uri: &str) -> Result<Self, ResolveError> {
        let rest = uri
            .strip_prefix(RESOURCE_SCHEME)
            .ok_or_else(|| ResolveError::InvalidArgument(format!("unsupported resource URI {uri}")))?;
        let (kind, params) = rest.split_once('/').ok_or_else(|| {
            ResolveError::InvalidArgument(format!("resource URI {uri} has no parameters"))
        })?;

        match kind {
            "alerts" => Ok(Self::Alerts(Region::parse(params)?)),
            "forecast" => {
                let parse = |s: Option<&str>| {
                    s.and_then(|v| v.trim().parse::<f64>().ok()).ok_or_else(|| {
                        ResolveError::InvalidArgument(format!(
                            "forecast resource expects latitude,longitude, got {params:?}"
                        ))
                    })
                };
                let mut parts = params.splitn(2, ',');
                let latitude = parse(parts.next())?;
                let longitude = parse(parts.next())?;
                Ok(Self::Forecast(Coordinate::new(latitude, longitude)?))
            }
            other => Err(ResolveError::InvalidArgument(format!(
                "unknown resource type {other:?}, expected alerts or forecast"
            ))),
        }
    }
}

fn invalid_params(err: ResolveError) -> McpError {
    McpError::invalid_params(err.to_string(), None)
}

fn pretty(document: &Document) -> String {
    serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string())
}

#[tool_handler]
impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "weather-gateway".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Weather alerts and forecasts for US locations from the National Weather Service. \
                Use get-alerts with a two-letter state code, get-forecast with a latitude and \
                longitude, or read weather://alerts/{state} and \
                weather://forecast/{latitude},{longitude}."
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: Vec::new(),
            next_cursor: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult {
            resource_templates: vec![RawResourceTemplate {
                uri_template: RESOURCE_TEMPLATE.into(),
                name: "Weather".into(),
                title: None,
                description: Some(
                    "Raw NWS document. type is alerts (params: two-letter state) or \
                     forecast (params: latitude,longitude)."
                        .into(),
                ),
                mime_type: Some("application/json".into()),
            }
            .no_annotation()],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_weather_resource(&request.uri).await
    }
}

#[tool_router]
impl WeatherServer {
    /// Gets active weather alerts for a US state
    #[tool(
        name = "get-alerts",
        description = "Get active weather alerts for a US state. Provide a two-letter state code (e.g., 'CA' for California, 'NY' for New York)."
    )]
    async fn get_alerts(
        &self,
        Parameters(request): Parameters<GetAlertsRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting alerts for state: {}", request.state);

        let region = Region::parse(&request.state).map_err(invalid_params)?;

        match self.resolver.resolve_alerts(region.as_str()).await {
            Ok(document) => Ok(CallToolResult::success(vec![
                Content::text(format_alerts(&region, &document)),
                Content::text(pretty(&document)),
            ])),
            Err(ResolveError::InvalidArgument(msg)) => {
                Err(McpError::invalid_params(msg, None))
            }
            Err(e) => {
                tracing::error!(error = %e, "Alerts lookup failed");
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Failed to retrieve alerts data for {}",
                    region.as_str()
                ))]))
            }
        }
    }

    /// Gets the weather forecast for a US coordinate
    #[tool(
        name = "get-forecast",
        description = "Get the weather forecast for a US location. Provide latitude (-90 to 90) and longitude (-180 to 180), e.g. latitude: 40.7128, longitude: -74.0060 for New York."
    )]
    async fn get_forecast(
        &self,
        Parameters(request): Parameters<GetForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            "Getting forecast for coordinates: {}, {}",
            request.latitude,
            request.longitude
        );

        let coordinate =
            Coordinate::new(request.latitude, request.longitude).map_err(invalid_params)?;
        let (latitude, longitude) = (coordinate.latitude(), coordinate.longitude());

        match self.resolver.resolve_forecast(latitude, longitude).await {
            Ok(document) => Ok(CallToolResult::success(vec![
                Content::text(format_forecast(latitude, longitude, &document)),
                Content::text(pretty(&document)),
            ])),
            Err(ResolveError::InvalidArgument(msg)) => {
                Err(McpError::invalid_params(msg, None))
            }
            Err(e) => {
                tracing::error!(error = %e, "Forecast lookup failed");
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Failed to retrieve forecast data for {}, {}",
                    degrees(latitude),
                    degrees(longitude)
                ))]))
            }
        }
    }
}
