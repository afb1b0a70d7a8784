use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::github::GitHubClient;
use crate::store::AccountStore;

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

/// Individual health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub store: CheckResult,
    pub github: CheckResult,
}

/// Result of an individual check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness probe response (minimal, just indicates the process is running)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Readiness probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Application state for health checks
#[derive(Clone)]
pub struct HealthState {
    pub store: AccountStore,
    pub github: Arc<GitHubClient>,
    pub start_time: std::time::Instant,
}

/// Create the health check router
pub fn create_health_router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check)) // Kubernetes convention
        .route("/livez", get(liveness_check)) // Kubernetes liveness probe
        .route("/readyz", get(readiness_check)) // Kubernetes readiness probe
        .with_state(state)
}

/// Main health check endpoint
async fn health_check(State(state): State<HealthState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();

    // The store is healthy when the data directory accepts writes.
    let store_check = match state.store.probe() {
        Ok(()) => CheckResult {
            status: HealthStatus::Healthy,
            message: None,
        },
        Err(e) => CheckResult {
            status: HealthStatus::Unhealthy,
            message: Some(format!("Store probe failed: {}", e)),
        },
    };

    // Upstream reachability and remaining quota. An exhausted quota degrades
    // the service but does not take it down.
    let github_check = match state.github.rate_limit().await {
        Ok(quota) if quota.is_limited => CheckResult {
            status: HealthStatus::Degraded,
            message: Some(format!("GitHub quota exhausted until {}", quota.reset_time)),
        },
        Ok(_) => CheckResult {
            status: HealthStatus::Healthy,
            message: None,
        },
        Err(e) => CheckResult {
            status: HealthStatus::Unhealthy,
            message: Some(format!("GitHub unreachable: {}", e)),
        },
    };

    // Determine overall status
    let overall_status = if matches!(store_check.status, HealthStatus::Unhealthy)
        || matches!(github_check.status, HealthStatus::Unhealthy)
    {
        HealthStatus::Unhealthy
    } else if matches!(store_check.status, HealthStatus::Degraded)
        || matches!(github_check.status, HealthStatus::Degraded)
    {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    let response = HealthResponse {
        status: overall_status.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        checks: HealthChecks {
            store: store_check,
            github: github_check,
        },
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::OK, // Still return 200 for degraded
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Kubernetes liveness probe - just checks if the process is alive
async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(LivenessResponse {
            status: "alive".to_string(),
        }),
    )
}

/// Kubernetes readiness probe - ready once the account store accepts writes.
/// Upstream GitHub availability does not gate readiness.
async fn readiness_check(State(state): State<HealthState>) -> impl IntoResponse {
    let (ready, message) = match state.store.probe() {
        Ok(()) => (true, None),
        Err(e) => (false, Some(format!("Not ready - store: {}", e))),
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(ReadinessResponse { ready, message }))
}
