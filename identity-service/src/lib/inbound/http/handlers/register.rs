use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityAssertionData;
use crate::domain::account::errors::EmailError;
use crate::domain::account::errors::FullNameError;
use crate::domain::account::errors::PasswordPolicyError;
use crate::domain::account::errors::PhoneNumberError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::FullName;
use crate::domain::account::models::Password;
use crate::domain::account::models::PhoneNumber;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn register<S: IdentityServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<IdentityAssertionData>, ApiError> {
    state
        .identity_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|assertion| ApiSuccess::new(StatusCode::OK, assertion.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    email: String,
    password: String,
    full_name: String,
    #[serde(default)]
    phone: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),

    #[error("Invalid full name: {0}")]
    FullName(#[from] FullNameError),

    #[error("Invalid phone: {0}")]
    Phone(#[from] PhoneNumberError),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        let full_name = FullName::new(self.full_name)?;
        let phone = self.phone.map(PhoneNumber::new).transpose()?;
        Ok(RegisterCommand::new(email, password, full_name, phone))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
