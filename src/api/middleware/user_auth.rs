//! Bearer token extractor for user-facing endpoints

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::UserProfile;

/// Extractor that resolves `Authorization: Bearer <token>` to the caller's
/// profile, rejecting with the auth service's error
#[derive(Debug, Clone)]
pub struct RequireUser(pub UserProfile);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let profile = state
            .auth_service
            .identify(authorization_header(&parts.headers))
            .await?;

        Ok(RequireUser(profile))
    }
}

/// Raw `Authorization` value; a header that is not visible ASCII counts as absent
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}
