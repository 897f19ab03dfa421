use anyhow::Context;
use sea_orm::Database;
use tracing::info;

use loket_auth_types::token::JwtSecret;
use loket_core::config::Config;
use loket_core::middleware::cors_layer;
use loket_core::tracing::init_tracing;

use loket_ticketing::config::TicketingConfig;
use loket_ticketing::router::build_router;
use loket_ticketing::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let config = TicketingConfig::from_env().context("load configuration")?;
    info!(?config, "starting ticketing service");

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    let state = AppState {
        db,
        jwt_secret: JwtSecret::new(config.jwt_secret.clone()),
        token_ttl_secs: config.token_ttl_secs,
        checkout_retry: config.checkout_retry(),
    };

    let router = build_router(state).layer(cors_layer(&config.cors_allowed_origins));
    let addr = format!("0.0.0.0:{}", config.ticketing_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("ticketing service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
