pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod validation;

#[cfg(test)]
pub mod testing;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{JwtAuth, JwtError};
use crate::config::AppConfig;
use crate::database::{AssetRepository, LogRepository, PgAssetRepository, PgLogRepository};
use crate::services::{AssetService, LogService};

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub assets: AssetService,
    pub logs: LogService,
    pub auth: Arc<JwtAuth>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the PostgreSQL repositories over `pool`.
    pub fn new(pool: PgPool, config: &AppConfig) -> Result<Self, JwtError> {
        let assets: Arc<dyn AssetRepository> = Arc::new(PgAssetRepository::new(pool.clone()));
        let logs: Arc<dyn LogRepository> = Arc::new(PgLogRepository::new(pool.clone()));
        Self::with_repositories(pool, assets, logs, config)
    }

    pub fn with_repositories(
        pool: PgPool,
        assets: Arc<dyn AssetRepository>,
        logs: Arc<dyn LogRepository>,
        config: &AppConfig,
    ) -> Result<Self, JwtError> {
        let pagination = &config.pagination;
        Ok(Self {
            pool,
            assets: AssetService::new(assets.clone(), pagination.asset_default_limit),
            logs: LogService::new(logs, assets, pagination.log_default_limit),
            auth: Arc::new(JwtAuth::from_config(&config.security)?),
            config: Arc::new(config.clone()),
        })
    }
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/assets",
            get(handlers::assets::list).post(handlers::assets::create),
        )
        .route(
            "/assets/:id",
            get(handlers::assets::get)
                .put(handlers::assets::update)
                .patch(handlers::assets::update)
                .delete(handlers::assets::delete),
        )
        .route(
            "/assets/:id/logs",
            get(handlers::logs::list_by_asset).post(handlers::logs::create),
        )
        .route(
            "/logs/:id",
            get(handlers::logs::get)
                .put(handlers::logs::update)
                .patch(handlers::logs::update)
                .delete(handlers::logs::delete),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.auth.clone(),
            middleware::jwt_auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api/v1", api)
        .layer(DefaultBodyLimit::max(state.config.server.request_body_limit_bytes))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.is_development() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}
