use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use auth::TokenError;

use crate::domain::account::models::IdentityClaims;
use crate::domain::account::ports::IdentityServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that verifies the bearer token and stores its claims in the
/// request extensions as `IdentityClaims`.
pub async fn authenticate<S: IdentityServicePort>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims: IdentityClaims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token verification failed");
        let message = match e {
            TokenError::Expired => "Token has expired",
            TokenError::InvalidSignature | TokenError::EncodingFailed(_) => "Invalid token",
        };
        ApiError::Unauthorized(message.to_string()).into_response()
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            ApiError::Unauthorized("Missing Authorization header".to_string()).into_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        ApiError::Unauthorized("Invalid Authorization header".to_string()).into_response()
    })?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ApiError::Unauthorized(
                "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
            )
            .into_response()
        })
}
