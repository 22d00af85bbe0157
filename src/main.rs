//! Staylink API server.

use std::error::Error;
use std::sync::Arc;

use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use staylink::adapters::auth::{HttpSessionTerminator, JwtConfig, JwtSessionValidator};
use staylink::adapters::http::{api_router, AppState, AuthState, Repositories};
use staylink::adapters::postgres::{
    PostgresAgentRepository, PostgresBookingRepository, PostgresCommissionRepository,
    PostgresFeatureRequestRepository, PostgresNotificationRepository, PostgresPartnerRepository,
    PostgresPropertyRepository, PostgresReferralLinkRepository, PostgresReviewRepository,
    PostgresRoleRepository, PostgresSupportTicketRepository,
};
use staylink::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        "Starting staylink"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied");
    }

    let mut jwt = JwtConfig::new(config.auth.jwt_secret.clone(), &config.auth.jwt_audience);
    if let Some(issuer) = &config.auth.jwt_issuer {
        jwt = jwt.with_issuer(issuer);
    }
    let validator: AuthState = Arc::new(JwtSessionValidator::new(jwt));
    let terminator = Arc::new(HttpSessionTerminator::new(
        &config.auth.url,
        config.auth.anon_key.clone(),
        config.auth.request_timeout(),
    )?);

    let state = AppState::new(repositories(pool), terminator, config.service_settings()?);
    let app = api_router(state, validator, &config.api_options());

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON lines in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

fn repositories(pool: PgPool) -> Repositories {
    Repositories {
        roles: Arc::new(PostgresRoleRepository::new(pool.clone())),
        partners: Arc::new(PostgresPartnerRepository::new(pool.clone())),
        agents: Arc::new(PostgresAgentRepository::new(pool.clone())),
        links: Arc::new(PostgresReferralLinkRepository::new(pool.clone())),
        properties: Arc::new(PostgresPropertyRepository::new(pool.clone())),
        feature_requests: Arc::new(PostgresFeatureRequestRepository::new(pool.clone())),
        bookings: Arc::new(PostgresBookingRepository::new(pool.clone())),
        commissions: Arc::new(PostgresCommissionRepository::new(pool.clone())),
        notifications: Arc::new(PostgresNotificationRepository::new(pool.clone())),
        tickets: Arc::new(PostgresSupportTicketRepository::new(pool.clone())),
        reviews: Arc::new(PostgresReviewRepository::new(pool)),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown requested");
}
