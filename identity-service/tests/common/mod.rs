use std::sync::Arc;

use auth::Authenticator;
use auth::HashingParams;
use auth::TokenIssuer;
use chrono::Duration;
use identity_service::domain::account::service::IdentityService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryAccountRepository;
use serde_json::json;
use serde_json::Value;

pub const TOKEN_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server on an ephemeral port
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub token_issuer: TokenIssuer,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap Argon2 settings keep the suite fast; production cost comes from config.
        let authenticator = Arc::new(
            Authenticator::with_hashing_params(
                TOKEN_SECRET,
                Duration::hours(24),
                HashingParams {
                    memory_kib: 1024,
                    iterations: 1,
                    parallelism: 1,
                },
            )
            .expect("Failed to create authenticator"),
        );

        let repository = Arc::new(InMemoryAccountRepository::new());
        let identity_service = Arc::new(IdentityService::new(
            repository,
            Arc::clone(&authenticator),
        ));

        let router = create_router(identity_service, authenticator);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            token_issuer: TokenIssuer::new(TOKEN_SECRET, Duration::hours(24)),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an account and return the response body
    pub async fn register(&self, email: &str, password: &str, full_name: &str) -> Value {
        let response = self
            .post("/api/auth/register")
            .json(&json!({
                "email": email,
                "password": password,
                "fullName": full_name
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in and return the bearer token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"].as_str().unwrap().to_string()
    }
}
