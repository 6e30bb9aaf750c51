mod config;
mod constants;
mod error;
mod formatters;
mod models;
mod resolver;
mod rest;
mod service;
mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use rmcp::ServiceExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Cli, Command};
use resolver::WeatherResolver;
use service::WeatherServer;
use upstream::NwsClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let upstream = NwsClient::new(&cli.upstream)?;
    let resolver = WeatherResolver::new(Arc::new(upstream), cli.upstream.base_url());
    tracing::info!(
        upstream = cli.upstream.base_url(),
        timeout_secs = cli.upstream.timeout_secs,
        "Weather resolver ready"
    );

    match cli.command {
        Command::Http { bind } => serve_http(resolver, bind).await?,
        Command::Stdio => serve_stdio(resolver).await?,
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn serve_stdio(resolver: WeatherResolver) -> Result<()> {
    tracing::info!("Starting MCP weather server on stdio");

    let server = WeatherServer::new(resolver).serve(rmcp::transport::stdio()).await?;
    server.waiting().await?;
    Ok(())
}

async fn serve_http(resolver: WeatherResolver, bind: SocketAddr) -> Result<()> {
    let mcp_server = WeatherServer::new(resolver.clone());
    let mcp = StreamableHttpService::new(
        move || Ok(mcp_server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let app = rest::router(resolver).nest_service("/mcp", mcp);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    tracing::info!("MCP endpoint: http://{}/mcp", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Received shutdown signal");
        })
        .await?;
    Ok(())
}
