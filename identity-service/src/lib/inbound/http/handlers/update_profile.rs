use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::ProfileData;
use crate::domain::account::errors::FullNameError;
use crate::domain::account::errors::PhoneNumberError;
use crate::domain::account::models::FullName;
use crate::domain::account::models::IdentityClaims;
use crate::domain::account::models::PhoneNumber;
use crate::domain::account::models::UpdateProfileCommand;
use crate::domain::account::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a profile (raw JSON)
///
/// Absent or null fields are left untouched. Role is not updatable here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseUpdateProfileRequestError {
    #[error("Invalid full name: {0}")]
    FullName(#[from] FullNameError),

    #[error("Invalid phone: {0}")]
    Phone(#[from] PhoneNumberError),
}

impl UpdateProfileRequest {
    fn try_into_command(self) -> Result<UpdateProfileCommand, ParseUpdateProfileRequestError> {
        let full_name = self.full_name.map(FullName::new).transpose()?;
        let phone = self.phone.map(PhoneNumber::new).transpose()?;

        Ok(UpdateProfileCommand { full_name, phone })
    }
}

impl From<ParseUpdateProfileRequestError> for ApiError {
    fn from(err: ParseUpdateProfileRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

pub async fn update_profile<S: IdentityServicePort>(
    State(state): State<AppState<S>>,
    Extension(claims): Extension<IdentityClaims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    let command = req.try_into_command()?;

    state
        .identity_service
        .update_profile(claims.private.account_id, command)
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}
