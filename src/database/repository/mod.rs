//! Tenant-scoped data access.
//!
//! Every method takes the caller's tenant as its first argument and filters
//! on it together with the row id, so a row owned by someone else looks
//! exactly like a row that does not exist.

pub mod asset;
pub mod asset_log;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Asset, AssetChanges, AssetLog, AssetLogChanges, NewAsset, NewAssetLog};
use crate::filter::{AssetFilter, LogFilter};

pub use asset::PgAssetRepository;
pub use asset_log::PgLogRepository;

#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn get_by_id(&self, tenant: &str, asset_id: Uuid) -> Result<Asset, DatabaseError>;

    async fn list(&self, tenant: &str, filter: &AssetFilter) -> Result<Vec<Asset>, DatabaseError>;

    /// Same predicates as [`AssetRepository::list`], without sorting or paging.
    async fn count(&self, tenant: &str, filter: &AssetFilter) -> Result<i64, DatabaseError>;

    async fn create(&self, tenant: &str, new: &NewAsset) -> Result<Asset, DatabaseError>;

    async fn update(&self, tenant: &str, asset_id: Uuid, changes: &AssetChanges) -> Result<Asset, DatabaseError>;

    /// Child logs go with the asset (foreign key cascade).
    async fn delete(&self, tenant: &str, asset_id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait LogRepository: Send + Sync {
    async fn get_by_id(&self, tenant: &str, log_id: Uuid) -> Result<AssetLog, DatabaseError>;

    async fn list_by_asset(
        &self,
        tenant: &str,
        asset_id: Uuid,
        filter: &LogFilter,
    ) -> Result<Vec<AssetLog>, DatabaseError>;

    async fn count_by_asset(&self, tenant: &str, asset_id: Uuid, filter: &LogFilter) -> Result<i64, DatabaseError>;

    /// Fails with `NotFound("asset not found")` when no asset with that id
    /// exists. Ownership of the asset is not checked here.
    async fn create(&self, tenant: &str, asset_id: Uuid, new: &NewAssetLog) -> Result<AssetLog, DatabaseError>;

    async fn update(&self, tenant: &str, log_id: Uuid, changes: &AssetLogChanges) -> Result<AssetLog, DatabaseError>;

    async fn delete(&self, tenant: &str, log_id: Uuid) -> Result<(), DatabaseError>;
}
