use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::user::ports::UserServicePort;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryCredentialStore;
use account_service::outbound::repositories::PostgresCredentialStore;
use auth::Authenticator;
use auth::Authorizer;
use auth::PasswordHasher;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        in_memory_store = config.store.is_in_memory(),
        token_ttl_seconds = config.jwt.expiration_seconds,
        password_iterations = config.password.iterations,
        "Configuration loaded"
    );

    if config.jwt.secret.is_empty() {
        tracing::warn!("JWT secret is not configured; every token operation will be refused");
    }

    let secret = config.jwt.secret.as_bytes();
    let authenticator = Arc::new(
        Authenticator::new(secret, config.jwt.expiration_seconds)
            .with_password_hasher(PasswordHasher::with_iterations(config.password.iterations)),
    );
    let authorizer = Arc::new(Authorizer::new(secret));

    let user_service: Arc<dyn UserServicePort> = if config.store.is_in_memory() {
        tracing::info!(store = "memory", "Credential store ready");
        Arc::new(UserService::new(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::clone(&authenticator),
        ))
    } else {
        let pg_pool = PgPoolOptions::new()
            .max_connections(config.store.max_connections)
            .connect(&config.store.url)
            .await?;
        tracing::info!(
            max_connections = config.store.max_connections,
            database = "postgresql",
            "Database connection pool created"
        );

        sqlx::migrate!("./migrations").run(&pg_pool).await?;
        tracing::info!(database = "postgresql", "Database migrations completed");

        Arc::new(UserService::new(
            Arc::new(PostgresCredentialStore::new(pg_pool)),
            Arc::clone(&authenticator),
        ))
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authorizer);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");
    Ok(())
}
