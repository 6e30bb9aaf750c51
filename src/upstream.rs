use async_trait::async_trait;
use reqwest::{header, Client};

use crate::config::UpstreamConfig;
use crate::constants::GEO_JSON;
use crate::error::{ResolveError, UpstreamFailure};
use crate::models::Document;

/// Single-GET fetch primitive the resolver is built on
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Document, ResolveError>;
}

/// reqwest-backed client for the National Weather Service API
#[derive(Debug, Clone)]
pub struct NwsClient {
    client: Client,
}

impl NwsClient {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Upstream for NwsClient {
    async fn fetch(&self, url: &str) -> Result<Document, ResolveError> {
        tracing::debug!(%url, "Fetching upstream document");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, GEO_JSON)
            .send()
            .await
            .map_err(|e| ResolveError::unavailable(url, classify(&e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "Upstream returned non-success status");
            return Err(ResolveError::unavailable(
                url,
                UpstreamFailure::Status(status.as_u16()),
            ));
        }

        response.json::<Document>().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "Upstream body was not JSON");
            ResolveError::unavailable(url, UpstreamFailure::Body(e.to_string()))
        })
    }
}

fn classify(err: &reqwest::Error) -> UpstreamFailure {
    if err.is_timeout() {
        UpstreamFailure::Timeout
    } else {
        UpstreamFailure::Transport(err.to_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Scripted upstream that records every URL it is asked for
    #[derive(Default)]
    pub struct RecordingUpstream {
        responses: HashMap<String, Result<Document, UpstreamFailure>>,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingUpstream {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, url: &str, document: Document) -> Self {
            self.responses.insert(url.to_string(), Ok(document));
            self
        }

        pub fn fail(mut self, url: &str, failure: UpstreamFailure) -> Self {
            self.responses.insert(url.to_string(), Err(failure));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Upstream for RecordingUpstream {
        async fn fetch(&self, url: &str) -> Result<Document, ResolveError> {
            self.calls.lock().unwrap().push(url.to_string());
            match self.responses.get(url) {
                Some(Ok(doc)) => Ok(doc.clone()),
                Some(Err(failure)) => Err(ResolveError::unavailable(url, failure.clone())),
                None => Err(ResolveError::unavailable(url, UpstreamFailure::Status(404))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::get, Json, Router};
    use serde_json::json;

    async fn spawn_stub() -> String {
        let app = Router::new()
            .route(
                "/echo-headers",
                get(|headers: HeaderMap| async move {
                    let value = |name: &str| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_string()
                    };
                    Json(json!({
                        "user_agent": value("user-agent"),
                        "accept": value("accept"),
                    }))
                }),
            )
            .route(
                "/broken",
                get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "down") }),
            )
            .route("/not-json", get(|| async { "<html>oops</html>" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
                    Json(json!({"properties": {}}))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client() -> NwsClient {
        let config = UpstreamConfig {
            user_agent: "weather-gateway-test/1.0".to_string(),
            ..UpstreamConfig::default()
        };
        NwsClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn sends_client_tag_and_geo_json_accept() {
        let base = spawn_stub().await;
        let doc = client().fetch(&format!("{base}/echo-headers")).await.unwrap();

        assert_eq!(doc["user_agent"], "weather-gateway-test/1.0");
        assert_eq!(doc["accept"], GEO_JSON);
    }

    #[tokio::test]
    async fn non_success_status_is_unavailable() {
        let base = spawn_stub().await;
        let err = client().fetch(&format!("{base}/broken")).await.unwrap_err();

        assert_eq!(
            err,
            ResolveError::UpstreamUnavailable {
                url: format!("{base}/broken"),
                failure: UpstreamFailure::Status(503),
            }
        );
    }

    #[tokio::test]
    async fn malformed_body_is_unavailable() {
        let base = spawn_stub().await;
        let err = client().fetch(&format!("{base}/not-json")).await.unwrap_err();

        assert!(matches!(
            err,
            ResolveError::UpstreamUnavailable {
                failure: UpstreamFailure::Body(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn configured_timeout_is_enforced() {
        let base = spawn_stub().await;
        let config = UpstreamConfig {
            timeout_secs: 1,
            ..UpstreamConfig::default()
        };
        let client = NwsClient::new(&config).unwrap();

        let started = std::time::Instant::now();
        let err = client.fetch(&format!("{base}/slow")).await.unwrap_err();

        assert_eq!(
            err,
            ResolveError::UpstreamUnavailable {
                url: format!("{base}/slow"),
                failure: UpstreamFailure::Timeout,
            }
        );
        assert!(started.elapsed() < std::time::Duration::from_secs(3));
    }

    #[tokio::test]
    async fn connection_refused_is_unavailable() {
        // Bind then drop so the port is very likely closed
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client().fetch(&format!("http://{addr}/points/1,2")).await.unwrap_err();
        assert_eq!(err.kind(), "upstream_unavailable");
    }
}
