use std::net::SocketAddr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::constants::{default_user_agent, DEFAULT_BIND, DEFAULT_TIMEOUT_SECS, NWS_API_BASE};

#[derive(Debug, Parser)]
#[command(
    name = "weather-gateway",
    about = "REST and MCP gateway for National Weather Service alerts and forecasts",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub upstream: UpstreamConfig,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the REST API and MCP streamable HTTP (at /mcp) on one listener
    Http {
        #[arg(long, env = "WEATHER_BIND", default_value = DEFAULT_BIND)]
        bind: SocketAddr,
    },
    /// Serve MCP over stdin/stdout
    Stdio,
}

/// Settings for talking to the upstream weather provider
#[derive(Debug, Clone, Args)]
pub struct UpstreamConfig {
    /// Base URL of the weather API
    #[arg(long, env = "WEATHER_UPSTREAM_BASE", default_value = NWS_API_BASE)]
    pub upstream_base: String,

    /// User-Agent sent with every upstream request
    #[arg(long, env = "WEATHER_USER_AGENT", default_value_t = default_user_agent())]
    pub user_agent: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "WEATHER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash so paths can be appended directly
    pub fn base_url(&self) -> &str {
        self.upstream_base.trim_end_matches('/')
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            upstream_base: NWS_API_BASE.to_string(),
            user_agent: default_user_agent(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
