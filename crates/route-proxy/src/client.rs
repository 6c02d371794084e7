//! HTTP implementation of [`RoutePlanner`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{RouteError, RoutePlanner, RouteProxyConfig};

#[derive(Serialize)]
struct RouteRequest<'a> {
    addresses: &'a [String],
}

/// Route planner backed by the external mapping microservice.
pub struct HttpRoutePlanner {
    client: Client,
    service_url: String,
    timeout: Duration,
}

impl HttpRoutePlanner {
    pub fn new(config: RouteProxyConfig) -> Self {
        Self {
            client: Client::new(),
            service_url: config.service_url,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[async_trait]
impl RoutePlanner for HttpRoutePlanner {
    async fn plan_route(&self, addresses: &[String]) -> Result<serde_json::Value, RouteError> {
        debug!(
            "Forwarding {} addresses to {}",
            addresses.len(),
            self.service_url
        );

        let response = self
            .client
            .post(&self.service_url)
            .timeout(self.timeout)
            .json(&RouteRequest { addresses })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RouteError::Timeout
                } else {
                    RouteError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Mapping service returned {status}: {message}");
            return Err(RouteError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let payload = response.json().await.map_err(|e| {
            if e.is_timeout() {
                RouteError::Timeout
            } else {
                RouteError::Transport(e)
            }
        })?;

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner_for(url: String, timeout_secs: u64) -> HttpRoutePlanner {
        HttpRoutePlanner::new(RouteProxyConfig {
            service_url: url,
            timeout_secs,
        })
    }

    #[tokio::test]
    async fn relays_service_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/getMap")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "addresses": ["1 Elm St", "2 Oak Ave"]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"link":"https://maps.example/route/abc"}"#)
            .create_async()
            .await;

        let planner = planner_for(format!("{}/getMap", server.url()), 5);
        let addresses = vec!["1 Elm St".to_string(), "2 Oak Ave".to_string()];
        let payload = planner.plan_route(&addresses).await.unwrap();

        assert_eq!(payload["link"], "https://maps.example/route/abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_address_list_still_calls_service() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/getMap")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "addresses": []
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"link":"https://maps.example/route/empty"}"#)
            .expect(1)
            .create_async()
            .await;

        let planner = planner_for(format!("{}/getMap", server.url()), 5);
        planner.plan_route(&[]).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn remote_failure_carries_upstream_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/getMap")
            .with_status(503)
            .with_body("geocoder overloaded")
            .create_async()
            .await;

        let planner = planner_for(format!("{}/getMap", server.url()), 5);
        let err = planner.plan_route(&["1 Elm St".to_string()]).await.unwrap_err();

        match err {
            RouteError::Remote { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "geocoder overloaded");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn exceeding_the_bound_is_a_timeout() {
        // A listener that accepts connections but never answers; the per-request
        // timeout must fire and map to RouteError::Timeout, not Transport.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            loop {
                match listener.accept().await {
                    Ok((stream, _)) => open.push(stream),
                    Err(_) => break,
                }
            }
        });

        let planner = HttpRoutePlanner {
            client: Client::new(),
            service_url: format!("http://{addr}/getMap"),
            timeout: Duration::from_millis(200),
        };

        let err = planner.plan_route(&["1 Elm St".to_string()]).await.unwrap_err();
        assert!(matches!(err, RouteError::Timeout), "got {err:?}");
    }
}
