//! Route-planning relay for the employee dashboard.
//!
//! The dashboard selects a set of pickup submissions and asks for a driving
//! route covering their addresses. Building that route is entirely the job of
//! an external mapping microservice; this crate only forwards the ordered
//! address list and relays back whatever payload the service produced
//! (expected to contain a navigable `link` field).
//!
//! The capability is expressed as the [`RoutePlanner`] trait so the concrete
//! provider can be swapped (or mocked in tests) without touching callers.
//! [`HttpRoutePlanner`] is the production implementation: one POST per
//! invocation, a bounded wait, no retries, and no local validation of the
//! address strings; malformed addresses are the mapping service's concern.

use async_trait::async_trait;
use thiserror::Error;

pub mod client;

pub use client::HttpRoutePlanner;

/// Default bound on how long to wait for the mapping service.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors surfaced by a route-planning call.
///
/// A timeout is deliberately distinct from other remote failures so callers
/// can answer with a 504 rather than a generic error.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("mapping service returned status {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("mapping service did not respond within the timeout")]
    Timeout,

    #[error("mapping service request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The route-planning capability.
#[async_trait]
pub trait RoutePlanner: Send + Sync {
    /// Forward `addresses` to the planner and return its payload verbatim.
    ///
    /// Exactly one external call is made per invocation, including for an
    /// empty address list.
    async fn plan_route(&self, addresses: &[String]) -> Result<serde_json::Value, RouteError>;
}

/// Configuration for the HTTP route planner.
#[derive(Debug, Clone)]
pub struct RouteProxyConfig {
    /// Full URL of the mapping service's route endpoint.
    pub service_url: String,

    /// Upper bound on the outbound call, in seconds.
    pub timeout_secs: u64,
}

impl Default for RouteProxyConfig {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:5000/getMap".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RouteProxyConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            service_url: std::env::var("ROUTE_SERVICE_URL").unwrap_or(default.service_url),
            timeout_secs: std::env::var("ROUTE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.timeout_secs),
        }
    }
}
