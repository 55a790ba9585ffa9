use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::api::{CreateLogRequest, ListResponse, LogResponse, UpdateLogRequest};
use crate::database::models::{AssetLogChanges, NewAssetLog};
use crate::database::repository::{AssetRepository, LogRepository};
use crate::error::ApiError;
use crate::filter::LogFilter;
use crate::validation::{clean_tags, normalize_tags, validate_request, validate_tag_lengths};

/// Log use cases. Listing and creating go through the parent asset first, so
/// a caller can only reach logs under assets they own.
#[derive(Clone)]
pub struct LogService {
    logs: Arc<dyn LogRepository>,
    assets: Arc<dyn AssetRepository>,
    default_limit: i64,
}

impl LogService {
    pub fn new(logs: Arc<dyn LogRepository>, assets: Arc<dyn AssetRepository>, default_limit: i64) -> Self {
        Self {
            logs,
            assets,
            default_limit,
        }
    }

    pub async fn list_by_asset(
        &self,
        tenant: &str,
        asset_id: Uuid,
        mut filter: LogFilter,
    ) -> Result<ListResponse<LogResponse>, ApiError> {
        filter.set_defaults(self.default_limit);
        filter.order()?;
        filter.tags = clean_tags(&filter.tags);

        self.assets.get_by_id(tenant, asset_id).await?;

        let rows = self.logs.list_by_asset(tenant, asset_id, &filter).await?;
        let total = self.logs.count_by_asset(tenant, asset_id, &filter).await?;
        Ok(ListResponse::new(rows, total, filter.limit, filter.offset))
    }

    pub async fn get(&self, tenant: &str, log_id: Uuid) -> Result<LogResponse, ApiError> {
        Ok(self.logs.get_by_id(tenant, log_id).await?.into())
    }

    pub async fn create(&self, tenant: &str, asset_id: Uuid, req: CreateLogRequest) -> Result<LogResponse, ApiError> {
        validate_request(&req)?;
        let tags = normalize_tags(req.tags.as_deref());
        validate_tag_lengths(tags.as_deref())?;

        self.assets.get_by_id(tenant, asset_id).await?;

        let new = NewAssetLog {
            content: req.content,
            tags,
        };
        let log = self.logs.create(tenant, asset_id, &new).await?;
        info!(tenant = %tenant, asset_id = %asset_id, log_id = %log.id, "Created log");
        Ok(log.into())
    }

    pub async fn update(&self, tenant: &str, log_id: Uuid, req: UpdateLogRequest) -> Result<LogResponse, ApiError> {
        validate_request(&req)?;
        let tags = normalize_tags(req.tags.as_deref());
        validate_tag_lengths(tags.as_deref())?;

        let changes = AssetLogChanges {
            content: req.content,
            tags,
        };
        let log = self.logs.update(tenant, log_id, &changes).await?;
        info!(tenant = %tenant, log_id = %log_id, "Updated log");
        Ok(log.into())
    }

    pub async fn delete(&self, tenant: &str, log_id: Uuid) -> Result<(), ApiError> {
        self.logs.delete(tenant, log_id).await?;
        info!(tenant = %tenant, log_id = %log_id, "Deleted log");
        Ok(())
    }
}
