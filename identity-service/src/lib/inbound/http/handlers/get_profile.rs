use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::ProfileData;
use crate::domain::account::models::IdentityClaims;
use crate::domain::account::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_profile<S: IdentityServicePort>(
    State(state): State<AppState<S>>,
    Extension(claims): Extension<IdentityClaims>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    state
        .identity_service
        .fetch_profile(claims.private.account_id)
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}
