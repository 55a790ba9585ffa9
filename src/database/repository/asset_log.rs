use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::LogRepository;
use crate::database::manager::DatabaseError;
use crate::database::models::{AssetLog, AssetLogChanges, NewAssetLog, ASSET_LOG_COLUMNS};
use crate::database::query_builder;
use crate::filter::{FilterError, FilterOrder, FilterSet, FilterWhere, LogFilter, SqlResult};

const NOT_FOUND: &str = "log not found";
const ASSET_NOT_FOUND: &str = "asset not found";

/// SQLSTATE for foreign_key_violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct PgLogRepository {
    pool: PgPool,
}

impl PgLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn list_where(tenant: &str, asset_id: Uuid, filter: &LogFilter) -> FilterWhere {
    let mut w = FilterWhere::new();
    w.eq("tenant", tenant).eq("asset_id", asset_id);
    if !filter.tags.is_empty() {
        w.contains_all("tags", filter.tags.clone());
    }
    if let Some(search) = filter.search.as_deref() {
        w.ilike_any(&["content"], search);
    }
    if let Some(start) = filter.start_date {
        w.gte("created_at", start);
    }
    if let Some(end) = filter.end_date {
        w.lte("created_at", end);
    }
    w
}

pub(crate) fn list_query(tenant: &str, asset_id: Uuid, filter: &LogFilter) -> Result<SqlResult, FilterError> {
    let order = filter.order()?;
    let mut w = list_where(tenant, asset_id, filter);
    let where_clause = w.to_sql();
    let limit = w.bind(filter.limit);
    let offset = w.bind(filter.offset);
    let query = format!(
        "SELECT {} FROM asset_logs WHERE {} {} LIMIT {} OFFSET {}",
        ASSET_LOG_COLUMNS,
        where_clause,
        FilterOrder::generate(&order),
        limit,
        offset
    );
    Ok(SqlResult { query, params: w.into_params() })
}

pub(crate) fn count_query(tenant: &str, asset_id: Uuid, filter: &LogFilter) -> SqlResult {
    let w = list_where(tenant, asset_id, filter);
    let query = format!("SELECT COUNT(*) AS count FROM asset_logs WHERE {}", w.to_sql());
    SqlResult { query, params: w.into_params() }
}

pub(crate) fn by_id_query(tenant: &str, log_id: Uuid) -> SqlResult {
    let mut w = FilterWhere::new();
    w.eq("id", log_id).eq("tenant", tenant);
    let query = format!("SELECT {} FROM asset_logs WHERE {}", ASSET_LOG_COLUMNS, w.to_sql());
    SqlResult { query, params: w.into_params() }
}

pub(crate) fn update_query(tenant: &str, log_id: Uuid, changes: &AssetLogChanges) -> SqlResult {
    let mut set = FilterSet::new();
    set.assign_opt("content", changes.content.clone())
        .assign_opt("tags", changes.tags.clone())
        .touch("updated_at");
    let (set_clause, mut w) = set.into_where();
    w.eq("id", log_id).eq("tenant", tenant);
    let query = format!(
        "UPDATE asset_logs SET {} WHERE {} RETURNING {}",
        set_clause,
        w.to_sql(),
        ASSET_LOG_COLUMNS
    );
    SqlResult { query, params: w.into_params() }
}

pub(crate) fn delete_query(tenant: &str, log_id: Uuid) -> SqlResult {
    let mut w = FilterWhere::new();
    w.eq("id", log_id).eq("tenant", tenant);
    SqlResult {
        query: format!("DELETE FROM asset_logs WHERE {}", w.to_sql()),
        params: w.into_params(),
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION),
        _ => false,
    }
}

#[async_trait]
impl LogRepository for PgLogRepository {
    async fn get_by_id(&self, tenant: &str, log_id: Uuid) -> Result<AssetLog, DatabaseError> {
        let sql = by_id_query(tenant, log_id);
        query_builder::fetch_optional::<AssetLog>(&self.pool, &sql)
            .await
            .map_err(DatabaseError::query("get log"))?
            .ok_or_else(|| DatabaseError::NotFound(NOT_FOUND.to_string()))
    }

    async fn list_by_asset(
        &self,
        tenant: &str,
        asset_id: Uuid,
        filter: &LogFilter,
    ) -> Result<Vec<AssetLog>, DatabaseError> {
        let sql = list_query(tenant, asset_id, filter)?;
        tracing::debug!(query = %sql.query, "list logs by asset");
        query_builder::fetch_all::<AssetLog>(&self.pool, &sql)
            .await
            .map_err(DatabaseError::query("list logs by asset"))
    }

    async fn count_by_asset(&self, tenant: &str, asset_id: Uuid, filter: &LogFilter) -> Result<i64, DatabaseError> {
        let sql = count_query(tenant, asset_id, filter);
        query_builder::fetch_count(&self.pool, &sql)
            .await
            .map_err(DatabaseError::query("count logs by asset"))
    }

    async fn create(&self, tenant: &str, asset_id: Uuid, new: &NewAssetLog) -> Result<AssetLog, DatabaseError> {
        let query = format!(
            "INSERT INTO asset_logs (asset_id, tenant, content, tags) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            ASSET_LOG_COLUMNS
        );
        sqlx::query_as::<_, AssetLog>(&query)
            .bind(asset_id)
            .bind(tenant)
            .bind(new.content.as_str())
            .bind(new.tags.clone())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    DatabaseError::NotFound(ASSET_NOT_FOUND.to_string())
                } else {
                    DatabaseError::query("create log")(e)
                }
            })
    }

    async fn update(&self, tenant: &str, log_id: Uuid, changes: &AssetLogChanges) -> Result<AssetLog, DatabaseError> {
        let sql = update_query(tenant, log_id, changes);
        tracing::debug!(query = %sql.query, "update log");
        query_builder::fetch_optional::<AssetLog>(&self.pool, &sql)
            .await
            .map_err(DatabaseError::query("update log"))?
            .ok_or_else(|| DatabaseError::NotFound(NOT_FOUND.to_string()))
    }

    async fn delete(&self, tenant: &str, log_id: Uuid) -> Result<(), DatabaseError> {
        let sql = delete_query(tenant, log_id);
        let result = query_builder::execute(&self.pool, &sql)
            .await
            .map_err(DatabaseError::query("delete log"))?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(())
    }
}
