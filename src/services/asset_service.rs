use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::api::{AssetResponse, CreateAssetRequest, ListResponse, UpdateAssetRequest};
use crate::database::models::{AssetChanges, NewAsset};
use crate::database::repository::AssetRepository;
use crate::error::ApiError;
use crate::filter::AssetFilter;
use crate::validation::{validate_asset_type, validate_json_object, validate_request};

/// Asset use cases for one authenticated tenant at a time.
#[derive(Clone)]
pub struct AssetService {
    repo: Arc<dyn AssetRepository>,
    default_limit: i64,
}

impl AssetService {
    pub fn new(repo: Arc<dyn AssetRepository>, default_limit: i64) -> Self {
        Self { repo, default_limit }
    }

    /// One page plus the total under the same filter. The two reads are
    /// separate round-trips and may drift under concurrent writes.
    pub async fn list(&self, tenant: &str, mut filter: AssetFilter) -> Result<ListResponse<AssetResponse>, ApiError> {
        filter.set_defaults(self.default_limit);
        filter.order()?;

        let rows = self.repo.list(tenant, &filter).await?;
        let total = self.repo.count(tenant, &filter).await?;
        Ok(ListResponse::new(rows, total, filter.limit, filter.offset))
    }

    pub async fn get(&self, tenant: &str, asset_id: Uuid) -> Result<AssetResponse, ApiError> {
        Ok(self.repo.get_by_id(tenant, asset_id).await?.into())
    }

    pub async fn create(&self, tenant: &str, req: CreateAssetRequest) -> Result<AssetResponse, ApiError> {
        validate_request(&req)?;
        let new = NewAsset {
            asset_type: validate_asset_type(req.asset_type.as_deref())?,
            metadata: validate_json_object(req.metadata.as_deref().map(|m| m.get()))?,
            name: req.name,
            hostname: req.hostname,
        };

        let asset = self.repo.create(tenant, &new).await?;
        info!(tenant = %tenant, asset_id = %asset.id, "Created asset");
        Ok(asset.into())
    }

    pub async fn update(
        &self,
        tenant: &str,
        asset_id: Uuid,
        req: UpdateAssetRequest,
    ) -> Result<AssetResponse, ApiError> {
        validate_request(&req)?;
        let changes = AssetChanges {
            asset_type: validate_asset_type(req.asset_type.as_deref())?,
            metadata: validate_json_object(req.metadata.as_deref().map(|m| m.get()))?,
            name: req.name,
            hostname: req.hostname,
        };

        let asset = self.repo.update(tenant, asset_id, &changes).await?;
        info!(tenant = %tenant, asset_id = %asset_id, "Updated asset");
        Ok(asset.into())
    }

    pub async fn delete(&self, tenant: &str, asset_id: Uuid) -> Result<(), ApiError> {
        self.repo.delete(tenant, asset_id).await?;
        info!(tenant = %tenant, asset_id = %asset_id, "Deleted asset");
        Ok(())
    }
}
