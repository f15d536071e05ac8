// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use crm_core::kernel::store::{BaseStore, MemoryStore, PgStore};
use crm_core::kernel::{
    BaseEmailService, InMemoryAnalytics, NoopEmailService, SendGridAdapter, ServerDeps,
};
use crm_core::{server::build_app, Config};
use sendgrid::{SendGridOptions, SendGridService};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,crm_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Event CRM API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(table_prefix = %config.table_prefix, "Configuration loaded");

    let store: Arc<dyn BaseStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connected");

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations complete");

            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (data is lost on exit)");
            Arc::new(MemoryStore::new())
        }
    };

    let email_service: Arc<dyn BaseEmailService> = match &config.sendgrid {
        Some(sendgrid) => {
            tracing::info!(sender = %sendgrid.sender_email, "SendGrid email transport enabled");
            let options = SendGridOptions::new(&sendgrid.api_key, &sendgrid.sender_email);
            Arc::new(SendGridAdapter::new(Arc::new(SendGridService::new(options))))
        }
        None => {
            tracing::warn!("SendGrid credentials not set, emails will only be logged");
            Arc::new(NoopEmailService)
        }
    };

    let deps = ServerDeps::new(
        store,
        &config.table_prefix,
        email_service,
        Arc::new(InMemoryAnalytics::new()),
        config.limits,
    );

    // Build application
    let app = build_app(deps);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
