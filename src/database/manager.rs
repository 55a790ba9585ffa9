use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::filter::FilterError;

/// Errors from the data layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    /// Row missing, or owned by another tenant. The two are deliberately
    /// indistinguishable.
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("{context}: {source}")]
    Query {
        context: &'static str,
        source: sqlx::Error,
    },

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Wrap a driver error with the operation that produced it, for use with
    /// `map_err(DatabaseError::query("list assets"))`.
    pub fn query(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| DatabaseError::Query { context, source }
    }

    /// True when the store could not be reached at all, as opposed to a query
    /// that ran and failed.
    pub fn is_unavailable(&self) -> bool {
        let source = match self {
            DatabaseError::Query { source, .. } => source,
            DatabaseError::Sqlx(source) => source,
            _ => return false,
        };
        matches!(
            source,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_)
        )
    }
}

/// Builds the shared connection pool and runs schema migrations.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the process-wide pool. Connections are checked out per query and
    /// returned on every exit path by the pool itself.
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let mut options = PgConnectOptions::from_str(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !config.enable_query_logging {
            options = options.disable_statement_logging();
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        info!(
            "Created database pool for {} (max_connections={})",
            Self::redact(url),
            config.max_connections
        );
        Ok(pool)
    }

    /// Apply pending migrations from `./migrations`.
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map_err(DatabaseError::query("health check"))?;
        Ok(())
    }

    /// Strip credentials from a connection string before it is logged.
    fn redact(url: &str) -> String {
        match url::Url::parse(url) {
            Ok(mut parsed) => {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("***"));
                }
                parsed.into()
            }
            Err(_) => "<unparseable url>".to_string(),
        }
    }
}
