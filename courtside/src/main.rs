//! Courtside HTTP server.
//!
//! Binary entry point that:
//! - Connects to MongoDB and creates the collection indexes
//! - Wires the production providers into an [`AppEnvironment`]
//! - Serves the REST API with graceful shutdown
//!
//! # Usage
//!
//! ```bash
//! # Start infrastructure
//! docker compose up -d
//!
//! # Run server
//! cargo run --bin courtside-server --features mongodb
//! ```

use courtside::config::Config;
use courtside::environment::AppEnvironment;
use courtside::providers::{
    Argon2PasswordHasher, SignedTokenService, SmtpEmailProvider, SystemClock,
};
use courtside::router::app_router;
use courtside::stores::{MongoEventStore, MongoUserStore};
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courtside=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Courtside HTTP Server");

    // Load configuration
    let config = Config::from_env();
    info!(
        mongodb_url = %config.mongodb.url,
        database = %config.mongodb.database,
        "Configuration loaded"
    );

    // Connect to the document store
    info!("Connecting to MongoDB...");
    let client = mongodb::Client::with_uri_str(&config.mongodb.url).await?;
    let db = client.database(&config.mongodb.database);

    let users = Arc::new(MongoUserStore::new(&db));
    let events = Arc::new(MongoEventStore::new(&db));

    info!("Creating collection indexes...");
    users.ensure_indexes().await?;
    events.ensure_indexes().await?;
    info!("Document store ready");

    // Wire production providers
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let tokens = Arc::new(SignedTokenService::new(
        config.auth.token_secret.as_bytes(),
        SystemClock,
    ));
    let email = Arc::new(SmtpEmailProvider::new(config.smtp.clone()));
    let clock = Arc::new(SystemClock);

    let env = AppEnvironment::new(users, events, hasher, tokens, email, clock);

    // Build router
    let app = app_router(env);

    // Create server address
    let addr = config.bind_addr();
    info!(address = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Completes when the process receives Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed, the failure is logged and that
/// branch never resolves; the other signal still triggers shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
