//! Authentication API endpoints
//!
//! Registration, login, token validation and caller lookup under
//! `/api/v1/auth`.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::UserProfile;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/validate", post(validate))
}

/// Register request; absent fields read as empty and fail validation
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .auth_service
        .register(&request.username, &request.email, &request.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let outcome = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        username: outcome.username,
    }))
}

/// GET /api/v1/auth/me
pub async fn me(RequireUser(profile): RequireUser) -> Json<UserProfile> {
    Json(profile)
}

/// POST /api/v1/auth/validate
///
/// 200 `{valid: true}` for a live token, 401 `{valid: false}` otherwise.
pub async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.token.is_empty() {
        return Err(ApiError::bad_request("token required"));
    }

    let valid = state.auth_service.validate(&request.token);
    let status = if valid {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };

    Ok((status, Json(ValidateResponse { valid })))
}
