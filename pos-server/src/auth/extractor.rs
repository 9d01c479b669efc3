//! JWT Extractor
//!
//! Handlers take [`CurrentUser`] as an argument; the user placed in the
//! request extensions by [`require_auth`](super::require_auth) is reused,
//! otherwise the bearer token is validated here.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(JwtService::extract_from_header)
            .ok_or_else(|| {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                AppError::unauthorized()
            })?;

        let user = state
            .jwt_service
            .validate_token(token)
            .and_then(CurrentUser::try_from)
            .map_err(|e| match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            })?;

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
