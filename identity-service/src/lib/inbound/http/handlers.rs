use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::AccountProfile;
use crate::domain::account::models::IdentityAssertion;

pub mod get_profile;
pub mod login;
pub mod register;
pub mod update_profile;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::DuplicateAccount(_)
            | AccountError::InvalidCredentials
            | AccountError::AccountNotFound(_) => ApiError::BadRequest(err.to_string()),
            // Everything else is a fault on our side; details stay in the logs.
            AccountError::InvalidEmail(_)
            | AccountError::InvalidFullName(_)
            | AccountError::InvalidPassword(_)
            | AccountError::InvalidRole(_)
            | AccountError::Storage(_)
            | AccountError::Credential(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Response body for registration and login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityAssertionData {
    pub token: String,
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: String,
}

impl From<IdentityAssertion> for IdentityAssertionData {
    fn from(assertion: IdentityAssertion) -> Self {
        Self {
            token: assertion.token,
            id: assertion.account_id.0,
            email: assertion.email.to_string(),
            full_name: assertion.full_name.to_string(),
            role: assertion.role.to_string(),
        }
    }
}

/// Response body for profile operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub phone: Option<String>,
}

impl From<AccountProfile> for ProfileData {
    fn from(profile: AccountProfile) -> Self {
        Self {
            id: profile.id.0,
            email: profile.email.to_string(),
            full_name: profile.full_name.to_string(),
            role: profile.role.to_string(),
            phone: profile.phone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::models::AccountId;

    #[test]
    fn test_business_errors_are_bad_requests() {
        assert_eq!(
            ApiError::from(AccountError::DuplicateAccount("a@x.com".to_string())),
            ApiError::BadRequest("Email already exists".to_string())
        );
        assert_eq!(
            ApiError::from(AccountError::InvalidCredentials),
            ApiError::BadRequest("Invalid email or password".to_string())
        );
        assert_eq!(
            ApiError::from(AccountError::AccountNotFound(AccountId(4))),
            ApiError::BadRequest("Account not found".to_string())
        );
    }

    #[test]
    fn test_infrastructure_errors_are_opaque() {
        let err = ApiError::from(AccountError::Storage(
            "password authentication failed for user \"postgres\"".to_string(),
        ));

        assert_eq!(
            err,
            ApiError::InternalServerError("Internal server error".to_string())
        );
    }

    #[test]
    fn test_duplicate_message_does_not_echo_email() {
        let ApiError::BadRequest(message) =
            ApiError::from(AccountError::DuplicateAccount("a@x.com".to_string()))
        else {
            panic!("expected bad request");
        };

        assert!(!message.contains("a@x.com"));
    }
}
