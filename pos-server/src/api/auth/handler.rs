//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::models::{LoginResponse, UserInfo};
use validator::Validate;

use crate::auth::{CurrentUser, users};
use crate::core::ServerState;
use crate::utils::validation::{MAX_PASSWORD_LEN_U64, MAX_USERNAME_LEN_U64, validate};
use crate::{AppError, AppResult, security_log};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 300;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, max = MAX_USERNAME_LEN_U64))]
    pub username: String,
    #[validate(length(min = 1, max = MAX_PASSWORD_LEN_U64))]
    pub password: String,
}

/// POST /api/auth/login
///
/// Returns a token plus the landing view of the user's role.
pub async fn login(
    State(state): State<ServerState>,
    Json(form): Json<LoginForm>,
) -> AppResult<Json<LoginResponse>> {
    validate(&form)?;

    let storage = state.storage.clone();
    let username = form.username.trim().to_string();
    let lookup_name = username.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        users::authenticate(&storage, &lookup_name, &form.password)
    })
    .await
    .map_err(|e| AppError::internal(format!("Login task failed: {e}")))?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match outcome {
        Ok(user) => user,
        Err(e) => {
            security_log!("WARN", "login_failed", username = username.clone());
            return Err(e);
        }
    };

    let info = user.info();
    let token = state
        .jwt_service
        .generate_token(&info)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = info.id,
        username = %info.username,
        role = %info.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        landing_view: info.role.landing_view(),
        user: info,
    }))
}

/// GET /api/auth/me
pub async fn me(user: CurrentUser) -> AppResult<Json<UserInfo>> {
    Ok(Json(user.info()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_bounds() {
        let form = |username: String, password: String| LoginForm { username, password };

        assert!(form("waiter".into(), "waiter".into()).validate().is_ok());
        assert!(form(String::new(), "waiter".into()).validate().is_err());
        assert!(form("w".repeat(MAX_USERNAME_LEN_U64 as usize + 1), "x".into())
            .validate()
            .is_err());
        assert!(form("waiter".into(), "p".repeat(MAX_PASSWORD_LEN_U64 as usize + 1))
            .validate()
            .is_err());
    }
}
