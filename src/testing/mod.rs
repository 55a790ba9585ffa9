//! In-memory stand-ins for the PostgreSQL repositories.
//!
//! They apply the same tenant scoping, sort allow-lists, foreign key check
//! and cascade as the real schema so service and router tests can run
//! without a database.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{Asset, AssetChanges, AssetLog, AssetLogChanges, NewAsset, NewAssetLog};
use crate::database::repository::{AssetRepository, LogRepository};
use crate::database::DatabaseError;
use crate::filter::{AssetFilter, FilterOrderInfo, LogFilter, SortDirection};

#[derive(Default)]
struct Tables {
    assets: Vec<Asset>,
    logs: Vec<AssetLog>,
}

/// Shared backing store; clone it to hand the same data to both repositories.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_count(&self) -> usize {
        self.tables.lock().unwrap().logs.len()
    }

    /// Write a log row directly, skipping every check. Used to set up rows
    /// whose tenant differs from the parent asset's owner.
    pub fn insert_raw_log(&self, log: AssetLog) {
        self.tables.lock().unwrap().logs.push(log);
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn directed(order: &FilterOrderInfo, ord: Ordering) -> Ordering {
    match order.sort {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

fn page<T>(rows: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    rows.into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

fn not_found(what: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("{} not found", what))
}

impl Tables {
    fn matching_assets(&self, tenant: &str, filter: &AssetFilter) -> Vec<Asset> {
        self.assets
            .iter()
            .filter(|a| a.tenant == tenant)
            .filter(|a| match filter.asset_type.as_deref() {
                Some(t) => a.asset_type.as_deref() == Some(t),
                None => true,
            })
            .filter(|a| match filter.search.as_deref() {
                Some(s) => contains_ci(&a.name, s) || a.hostname.as_deref().is_some_and(|h| contains_ci(h, s)),
                None => true,
            })
            .cloned()
            .collect()
    }

    fn matching_logs(&self, tenant: &str, asset_id: Uuid, filter: &LogFilter) -> Vec<AssetLog> {
        self.logs
            .iter()
            .filter(|l| l.tenant == tenant && l.asset_id == asset_id)
            .filter(|l| {
                let stored = l.tags.as_deref().unwrap_or_default();
                filter.tags.iter().all(|t| stored.contains(t))
            })
            .filter(|l| filter.search.as_deref().map_or(true, |s| contains_ci(&l.content, s)))
            .filter(|l| filter.start_date.map_or(true, |start| l.created_at >= start))
            .filter(|l| filter.end_date.map_or(true, |end| l.created_at <= end))
            .cloned()
            .collect()
    }
}

#[derive(Clone)]
pub struct MemoryAssetRepository {
    store: MemoryStore,
}

impl MemoryAssetRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AssetRepository for MemoryAssetRepository {
    async fn get_by_id(&self, tenant: &str, asset_id: Uuid) -> Result<Asset, DatabaseError> {
        let tables = self.store.tables.lock().unwrap();
        tables
            .assets
            .iter()
            .find(|a| a.id == asset_id && a.tenant == tenant)
            .cloned()
            .ok_or_else(|| not_found("asset"))
    }

    async fn list(&self, tenant: &str, filter: &AssetFilter) -> Result<Vec<Asset>, DatabaseError> {
        let order = filter.order()?;
        let mut rows = self.store.tables.lock().unwrap().matching_assets(tenant, filter);
        rows.sort_by(|a, b| {
            let ord = match order.column {
                "name" => a.name.cmp(&b.name),
                "updated_at" => a.updated_at.cmp(&b.updated_at),
                _ => a.created_at.cmp(&b.created_at),
            };
            directed(&order, ord.then_with(|| a.id.cmp(&b.id)))
        });
        Ok(page(rows, filter.limit, filter.offset))
    }

    async fn count(&self, tenant: &str, filter: &AssetFilter) -> Result<i64, DatabaseError> {
        Ok(self.store.tables.lock().unwrap().matching_assets(tenant, filter).len() as i64)
    }

    async fn create(&self, tenant: &str, new: &NewAsset) -> Result<Asset, DatabaseError> {
        let now = Utc::now();
        let asset = Asset {
            id: Uuid::new_v4(),
            tenant: tenant.to_string(),
            name: new.name.clone(),
            asset_type: new.asset_type.map(|t| t.as_str().to_string()),
            hostname: new.hostname.clone(),
            metadata: new.metadata.clone(),
            created_at: now,
            updated_at: now,
        };
        self.store.tables.lock().unwrap().assets.push(asset.clone());
        Ok(asset)
    }

    async fn update(&self, tenant: &str, asset_id: Uuid, changes: &AssetChanges) -> Result<Asset, DatabaseError> {
        let mut tables = self.store.tables.lock().unwrap();
        let asset = tables
            .assets
            .iter_mut()
            .find(|a| a.id == asset_id && a.tenant == tenant)
            .ok_or_else(|| not_found("asset"))?;
        if let Some(name) = &changes.name {
            asset.name = name.clone();
        }
        if let Some(t) = changes.asset_type {
            asset.asset_type = Some(t.as_str().to_string());
        }
        if let Some(hostname) = &changes.hostname {
            asset.hostname = Some(hostname.clone());
        }
        if let Some(metadata) = &changes.metadata {
            asset.metadata = Some(metadata.clone());
        }
        asset.updated_at = Utc::now();
        Ok(asset.clone())
    }

    async fn delete(&self, tenant: &str, asset_id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.store.tables.lock().unwrap();
        let before = tables.assets.len();
        tables.assets.retain(|a| !(a.id == asset_id && a.tenant == tenant));
        if tables.assets.len() == before {
            return Err(not_found("asset"));
        }
        tables.logs.retain(|l| l.asset_id != asset_id);
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemoryLogRepository {
    store: MemoryStore,
}

impl MemoryLogRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LogRepository for MemoryLogRepository {
    async fn get_by_id(&self, tenant: &str, log_id: Uuid) -> Result<AssetLog, DatabaseError> {
        let tables = self.store.tables.lock().unwrap();
        tables
            .logs
            .iter()
            .find(|l| l.id == log_id && l.tenant == tenant)
            .cloned()
            .ok_or_else(|| not_found("log"))
    }

    async fn list_by_asset(
        &self,
        tenant: &str,
        asset_id: Uuid,
        filter: &LogFilter,
    ) -> Result<Vec<AssetLog>, DatabaseError> {
        let order = filter.order()?;
        let mut rows = self.store.tables.lock().unwrap().matching_logs(tenant, asset_id, filter);
        rows.sort_by(|a, b| {
            let ord = match order.column {
                "updated_at" => a.updated_at.cmp(&b.updated_at),
                _ => a.created_at.cmp(&b.created_at),
            };
            directed(&order, ord.then_with(|| a.id.cmp(&b.id)))
        });
        Ok(page(rows, filter.limit, filter.offset))
    }

    async fn count_by_asset(&self, tenant: &str, asset_id: Uuid, filter: &LogFilter) -> Result<i64, DatabaseError> {
        Ok(self.store.tables.lock().unwrap().matching_logs(tenant, asset_id, filter).len() as i64)
    }

    async fn create(&self, tenant: &str, asset_id: Uuid, new: &NewAssetLog) -> Result<AssetLog, DatabaseError> {
        let mut tables = self.store.tables.lock().unwrap();
        // Existence only, like the foreign key.
        if !tables.assets.iter().any(|a| a.id == asset_id) {
            return Err(not_found("asset"));
        }
        let now = Utc::now();
        let log = AssetLog {
            id: Uuid::new_v4(),
            asset_id,
            tenant: tenant.to_string(),
            content: new.content.clone(),
            tags: new.tags.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.logs.push(log.clone());
        Ok(log)
    }

    async fn update(&self, tenant: &str, log_id: Uuid, changes: &AssetLogChanges) -> Result<AssetLog, DatabaseError> {
        let mut tables = self.store.tables.lock().unwrap();
        let log = tables
            .logs
            .iter_mut()
            .find(|l| l.id == log_id && l.tenant == tenant)
            .ok_or_else(|| not_found("log"))?;
        if let Some(content) = &changes.content {
            log.content = content.clone();
        }
        if let Some(tags) = &changes.tags {
            log.tags = Some(tags.clone());
        }
        log.updated_at = Utc::now();
        Ok(log.clone())
    }

    async fn delete(&self, tenant: &str, log_id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.store.tables.lock().unwrap();
        let before = tables.logs.len();
        tables.logs.retain(|l| !(l.id == log_id && l.tenant == tenant));
        if tables.logs.len() == before {
            return Err(not_found("log"));
        }
        Ok(())
    }
}

/// Both repositories over one fresh store.
pub fn memory_repositories() -> (MemoryStore, Arc<dyn AssetRepository>, Arc<dyn LogRepository>) {
    let store = MemoryStore::new();
    let assets: Arc<dyn AssetRepository> = Arc::new(MemoryAssetRepository::new(store.clone()));
    let logs: Arc<dyn LogRepository> = Arc::new(MemoryLogRepository::new(store.clone()));
    (store, assets, logs)
}
