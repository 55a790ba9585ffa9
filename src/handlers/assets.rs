use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use super::{json_body, parse_id, query_params};
use crate::api::{AssetResponse, CreateAssetRequest, ListResponse, UpdateAssetRequest};
use crate::filter::AssetFilter;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/// GET /api/v1/assets
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<AssetFilter>, QueryRejection>,
) -> ApiResult<ListResponse<AssetResponse>> {
    let filter = query_params(query)?;
    let page = state.assets.list(&user.tenant, filter).await?;
    Ok(ApiResponse::success(page))
}

/// POST /api/v1/assets
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateAssetRequest>, JsonRejection>,
) -> ApiResult<AssetResponse> {
    let req = json_body(payload)?;
    let asset = state.assets.create(&user.tenant, req).await?;
    Ok(ApiResponse::created(asset))
}

/// GET /api/v1/assets/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<AssetResponse> {
    let asset_id = parse_id(&id, "asset")?;
    Ok(ApiResponse::success(state.assets.get(&user.tenant, asset_id).await?))
}

/// PUT or PATCH /api/v1/assets/:id. Both are partial.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAssetRequest>, JsonRejection>,
) -> ApiResult<AssetResponse> {
    let asset_id = parse_id(&id, "asset")?;
    let req = json_body(payload)?;
    Ok(ApiResponse::success(state.assets.update(&user.tenant, asset_id, req).await?))
}

/// DELETE /api/v1/assets/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let asset_id = parse_id(&id, "asset")?;
    state.assets.delete(&user.tenant, asset_id).await?;
    Ok(ApiResponse::no_content())
}
