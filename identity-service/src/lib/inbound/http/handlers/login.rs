use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityAssertionData;
use crate::domain::account::errors::AccountError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn login<S: IdentityServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<IdentityAssertionData>, ApiError> {
    // A malformed handle cannot match any account; answer exactly as for a
    // wrong password.
    let email =
        EmailAddress::new(body.email).map_err(|_| ApiError::from(AccountError::InvalidCredentials))?;

    state
        .identity_service
        .login(LoginCommand {
            email,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)
        .map(|assertion| ApiSuccess::new(StatusCode::OK, assertion.into()))
}

/// HTTP request body for logging in (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}
