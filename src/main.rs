use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use utoipa::{openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme}, Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::Config, routes::init_routes, services::leaderboard_service::LeaderboardService};

mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod store;
mod utils;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health_check,
        routes::readiness_check,
        routes::leaderboard::update_score,
        routes::leaderboard::update_score_info,
        routes::leaderboard::get_leaderboard,
        routes::leaderboard::leaderboard_timestamp,
        routes::leaderboard::clear_leaderboard,
        routes::leaderboard::clear_leaderboard_info,
    ),
    components(
        schemas(
            models::score_event::ScoreEvent,
            models::leaderboard::ScoreEntry,
            models::leaderboard::RankedEntry,
            routes::leaderboard::UpdateScoreResponse,
            routes::leaderboard::LeaderboardResponse,
            routes::leaderboard::TimestampResponse,
            routes::leaderboard::ClearResponse,
            error::ErrorBody,
        ),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

/// Registers the `webhook_secret` bearer scheme referenced by `POST /update-score`.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let comps = openapi.components.get_or_insert_with(Default::default);
        comps.add_security_scheme(
            "webhook_secret",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// Full application: API routes, Swagger UI, CORS for the polling page, request tracing.
pub fn build_app(service: Arc<LeaderboardService>, config: Arc<Config>) -> Router {
    Router::new()
        .merge(init_routes(service, config))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    info!("Starting quiz leaderboard v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!("  Listen address: {}", config.listen_addr);
    info!("  Max connections: {}", config.max_connections);
    if config.webhook_secret.is_none() {
        info!("WEBHOOK_SECRET not set; /update-score accepts unauthenticated events");
    }

    let store = db::init_store(&config).await?;
    let service = Arc::new(LeaderboardService::new(store));
    let listen_addr = config.listen_addr;
    let app = build_app(service, Arc::new(config));

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("Leaderboard ready on {}", listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests;
