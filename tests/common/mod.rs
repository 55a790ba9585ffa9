#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use homelab_api::auth::JwtAuth;
use homelab_api::config::AppConfig;
use homelab_api::database::DatabaseManager;
use homelab_api::{app, AppState};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::net::TcpListener;
use uuid::Uuid;

/// Pool against `TEST_DATABASE_URL` (or `DATABASE_URL`) with migrations
/// applied. `None` means no database is configured and the caller should skip.
pub async fn test_pool() -> Result<Option<PgPool>> {
    let _ = dotenvy::dotenv();
    let Some(url) = std::env::var("TEST_DATABASE_URL")
        .ok()
        .or_else(|| std::env::var("DATABASE_URL").ok())
    else {
        eprintln!("skipping: TEST_DATABASE_URL / DATABASE_URL not set");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .context("failed to connect to test database")?;
    DatabaseManager::migrate(&pool).await?;
    Ok(Some(pool))
}

/// Tenant names are unique per call so runs never see each other's rows.
pub fn tenant(name: &str) -> String {
    format!("{}-{}", name, Uuid::new_v4().simple())
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::from_env();
    config.security.jwt_secret = "integration-test-secret".to_string();
    config.security.jwt_public_key_pem = None;
    config.security.jwt_issuer = None;
    config.security.jwt_audience = None;
    config
}

pub struct TestServer {
    pub base_url: String,
    pub auth: Arc<JwtAuth>,
}

impl TestServer {
    pub fn token(&self, tenant: &str) -> String {
        self.auth.issue(tenant, 5).expect("test token")
    }
}

/// Serve the full router on an ephemeral port for the lifetime of the test.
pub async fn spawn_server(pool: PgPool) -> Result<TestServer> {
    let state = AppState::new(pool, &test_config())?;
    let auth = state.auth.clone();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        auth,
    })
}
