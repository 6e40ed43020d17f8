//! Health check endpoints for Kubernetes probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::error;

use crate::api::types::Json;

use super::state::AppState;

const DIRECTORY_UNAVAILABLE: &str = "unavailable";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Returns 200 while the process is up
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION"),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness: the user directory must answer
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let directory = match state.auth_service.check_directory().await {
        Ok(()) => HealthCheck {
            name: "user_directory",
            status: HealthStatus::Healthy,
            message: None,
        },
        Err(e) => {
            error!(error = %e, "User directory readiness check failed");
            HealthCheck {
                name: "user_directory",
                status: HealthStatus::Unhealthy,
                message: Some(DIRECTORY_UNAVAILABLE.to_string()),
            }
        }
    };

    let status = directory.status;
    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks: Some(vec![directory]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness probe
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::api::{create_router_with_state, AppState};
    use crate::config::CorsConfig;
    use crate::domain::user::MockUserRepository;
    use crate::domain::DomainError;
    use crate::infrastructure::auth::{AuthService, JwtConfig, JwtService};
    use crate::infrastructure::user::Argon2Hasher;

    fn state_with(users: MockUserRepository) -> AppState {
        let service = AuthService::new(
            Arc::new(users),
            Arc::new(Argon2Hasher::default()),
            Arc::new(JwtService::new(JwtConfig::with_secret("test-secret"))),
        );
        AppState::new(Arc::new(service))
    }

    async fn ready(users: MockUserRepository) -> (StatusCode, Value) {
        let app = create_router_with_state(state_with(users), &CorsConfig::default());
        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_ready_unreachable_directory() {
        let mut users = MockUserRepository::new();
        users.expect_health_check().returning(|| {
            Err(DomainError::storage(
                "pool timed out while waiting for an open connection to 10.0.0.5:5432",
            ))
        });

        let (status, body) = ready(users).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["checks"][0]["name"], "user_directory");
        assert_eq!(body["checks"][0]["status"], "unhealthy");
        assert_eq!(body["checks"][0]["message"], "unavailable");
        assert!(!body.to_string().contains("10.0.0.5"));
    }

    #[tokio::test]
    async fn test_ready_healthy_directory() {
        let mut users = MockUserRepository::new();
        users.expect_health_check().returning(|| Ok(()));

        let (status, body) = ready(users).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["checks"][0].get("message").is_none());
    }
}
