use std::sync::Arc;

use auth::Authenticator;
use chrono::Duration;
use identity_service::config::Config;
use identity_service::domain::account::service::IdentityService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryAccountRepository;
use identity_service::outbound::repositories::PostgresAccountRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_hours = config.jwt.expiration_hours,
        argon2_memory_kib = config.password.memory_kib,
        argon2_iterations = config.password.iterations,
        storage = if config.database.is_some() { "postgresql" } else { "memory" },
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::with_hashing_params(
        config.jwt.secret.as_bytes(),
        Duration::hours(config.jwt.expiration_hours),
        config.password.into(),
    )?);

    let http_application = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let repository = Arc::new(PostgresAccountRepository::new(pg_pool));
            let identity_service =
                Arc::new(IdentityService::new(repository, Arc::clone(&authenticator)));
            create_router(identity_service, Arc::clone(&authenticator))
        }
        None => {
            tracing::warn!("No database configured, accounts will not survive a restart");

            let repository = Arc::new(InMemoryAccountRepository::new());
            let identity_service =
                Arc::new(IdentityService::new(repository, Arc::clone(&authenticator)));
            create_router(identity_service, Arc::clone(&authenticator))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
