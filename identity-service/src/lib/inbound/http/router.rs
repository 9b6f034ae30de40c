use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_profile::get_profile;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::update_profile::update_profile;
use super::middleware::authenticate as auth_middleware;
use crate::domain::account::ports::IdentityServicePort;

pub struct AppState<S: IdentityServicePort> {
    pub identity_service: Arc<S>,
    pub authenticator: Arc<Authenticator>,
}

impl<S: IdentityServicePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            identity_service: Arc::clone(&self.identity_service),
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

pub fn create_router<S: IdentityServicePort>(
    identity_service: Arc<S>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        identity_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register::<S>))
        .route("/api/auth/login", post(login::<S>));

    let protected_routes = Router::new()
        .route(
            "/api/auth/profile",
            get(get_profile::<S>).put(update_profile::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<S>,
        ));

    // Request headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
