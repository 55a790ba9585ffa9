use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, RawQuery, State};
use axum::http::Uri;
use axum::{Extension, Json};

use super::{json_body, parse_id, query_params};
use crate::api::{CreateLogRequest, ListResponse, LogResponse, UpdateLogRequest};
use crate::error::ApiError;
use crate::filter::{fold_repeated_tags, LogFilter};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/// `tags` may be comma separated, repeated, or both.
fn log_filter(raw_query: Option<String>) -> Result<LogFilter, ApiError> {
    let folded = fold_repeated_tags(raw_query.as_deref().unwrap_or_default());
    let uri: Uri = format!("/?{}", folded)
        .parse()
        .map_err(|_| ApiError::bad_request("malformed query string"))?;
    query_params(Query::try_from_uri(&uri))
}

/// GET /api/v1/assets/:id/logs
pub async fn list_by_asset(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    RawQuery(raw_query): RawQuery,
) -> ApiResult<ListResponse<LogResponse>> {
    let asset_id = parse_id(&id, "asset")?;
    let filter = log_filter(raw_query)?;
    let page = state.logs.list_by_asset(&user.tenant, asset_id, filter).await?;
    Ok(ApiResponse::success(page))
}

/// POST /api/v1/assets/:id/logs
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<CreateLogRequest>, JsonRejection>,
) -> ApiResult<LogResponse> {
    let asset_id = parse_id(&id, "asset")?;
    let req = json_body(payload)?;
    let log = state.logs.create(&user.tenant, asset_id, req).await?;
    Ok(ApiResponse::created(log))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<LogResponse> {
    let log_id = parse_id(&id, "log")?;
    Ok(ApiResponse::success(state.logs.get(&user.tenant, log_id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLogRequest>, JsonRejection>,
) -> ApiResult<LogResponse> {
    let log_id = parse_id(&id, "log")?;
    let req = json_body(payload)?;
    Ok(ApiResponse::success(state.logs.update(&user.tenant, log_id, req).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let log_id = parse_id(&id, "log")?;
    state.logs.delete(&user.tenant, log_id).await?;
    Ok(ApiResponse::no_content())
}
