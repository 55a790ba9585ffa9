use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::AssetRepository;
use crate::database::manager::DatabaseError;
use crate::database::models::{Asset, AssetChanges, NewAsset, ASSET_COLUMNS};
use crate::database::query_builder;
use crate::filter::{AssetFilter, FilterError, FilterOrder, FilterSet, FilterWhere, SqlResult};

const NOT_FOUND: &str = "asset not found";

#[derive(Clone)]
pub struct PgAssetRepository {
    pool: PgPool,
}

impl PgAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn list_where(tenant: &str, filter: &AssetFilter) -> FilterWhere {
    let mut w = FilterWhere::new();
    w.eq("tenant", tenant);
    if let Some(asset_type) = filter.asset_type.as_deref() {
        w.eq("type", asset_type);
    }
    if let Some(search) = filter.search.as_deref() {
        w.ilike_any(&["name", "hostname"], search);
    }
    w
}

/// Fails on a sort column or direction outside the allow-list, before any SQL
/// is produced.
pub(crate) fn list_query(tenant: &str, filter: &AssetFilter) -> Result<SqlResult, FilterError> {
    let order = filter.order()?;
    let mut w = list_where(tenant, filter);
    let where_clause = w.to_sql();
    let limit = w.bind(filter.limit);
    let offset = w.bind(filter.offset);
    let query = format!(
        "SELECT {} FROM assets WHERE {} {} LIMIT {} OFFSET {}",
        ASSET_COLUMNS,
        where_clause,
        FilterOrder::generate(&order),
        limit,
        offset
    );
    Ok(SqlResult { query, params: w.into_params() })
}

pub(crate) fn count_query(tenant: &str, filter: &AssetFilter) -> SqlResult {
    let w = list_where(tenant, filter);
    let query = format!("SELECT COUNT(*) AS count FROM assets WHERE {}", w.to_sql());
    SqlResult { query, params: w.into_params() }
}

pub(crate) fn by_id_query(tenant: &str, asset_id: Uuid) -> SqlResult {
    let mut w = FilterWhere::new();
    w.eq("id", asset_id).eq("tenant", tenant);
    let query = format!("SELECT {} FROM assets WHERE {}", ASSET_COLUMNS, w.to_sql());
    SqlResult { query, params: w.into_params() }
}

pub(crate) fn update_query(tenant: &str, asset_id: Uuid, changes: &AssetChanges) -> SqlResult {
    let mut set = FilterSet::new();
    set.assign_opt("name", changes.name.clone())
        .assign_opt("type", changes.asset_type.map(|t| t.as_str()))
        .assign_opt("hostname", changes.hostname.clone())
        .assign_opt("metadata", changes.metadata.clone())
        .touch("updated_at");
    let (set_clause, mut w) = set.into_where();
    w.eq("id", asset_id).eq("tenant", tenant);
    let query = format!(
        "UPDATE assets SET {} WHERE {} RETURNING {}",
        set_clause,
        w.to_sql(),
        ASSET_COLUMNS
    );
    SqlResult { query, params: w.into_params() }
}

pub(crate) fn delete_query(tenant: &str, asset_id: Uuid) -> SqlResult {
    let mut w = FilterWhere::new();
    w.eq("id", asset_id).eq("tenant", tenant);
    SqlResult {
        query: format!("DELETE FROM assets WHERE {}", w.to_sql()),
        params: w.into_params(),
    }
}

#[async_trait]
impl AssetRepository for PgAssetRepository {
    async fn get_by_id(&self, tenant: &str, asset_id: Uuid) -> Result<Asset, DatabaseError> {
        let sql = by_id_query(tenant, asset_id);
        query_builder::fetch_optional::<Asset>(&self.pool, &sql)
            .await
            .map_err(DatabaseError::query("get asset"))?
            .ok_or_else(|| DatabaseError::NotFound(NOT_FOUND.to_string()))
    }

    async fn list(&self, tenant: &str, filter: &AssetFilter) -> Result<Vec<Asset>, DatabaseError> {
        let sql = list_query(tenant, filter)?;
        tracing::debug!(query = %sql.query, "list assets");
        query_builder::fetch_all::<Asset>(&self.pool, &sql)
            .await
            .map_err(DatabaseError::query("list assets"))
    }

    async fn count(&self, tenant: &str, filter: &AssetFilter) -> Result<i64, DatabaseError> {
        let sql = count_query(tenant, filter);
        query_builder::fetch_count(&self.pool, &sql)
            .await
            .map_err(DatabaseError::query("count assets"))
    }

    async fn create(&self, tenant: &str, new: &NewAsset) -> Result<Asset, DatabaseError> {
        let query = format!(
            "INSERT INTO assets (tenant, name, type, hostname, metadata) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ASSET_COLUMNS
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(tenant)
            .bind(new.name.as_str())
            .bind(new.asset_type.map(|t| t.as_str()))
            .bind(new.hostname.as_deref())
            .bind(new.metadata.clone())
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::query("create asset"))
    }

    async fn update(&self, tenant: &str, asset_id: Uuid, changes: &AssetChanges) -> Result<Asset, DatabaseError> {
        let sql = update_query(tenant, asset_id, changes);
        tracing::debug!(query = %sql.query, "update asset");
        query_builder::fetch_optional::<Asset>(&self.pool, &sql)
            .await
            .map_err(DatabaseError::query("update asset"))?
            .ok_or_else(|| DatabaseError::NotFound(NOT_FOUND.to_string()))
    }

    async fn delete(&self, tenant: &str, asset_id: Uuid) -> Result<(), DatabaseError> {
        let sql = delete_query(tenant, asset_id);
        let result = query_builder::execute(&self.pool, &sql)
            .await
            .map_err(DatabaseError::query("delete asset"))?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(())
    }
}
