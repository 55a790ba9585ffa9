use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::AssetType;

pub const ASSET_COLUMNS: &str = "id, tenant, name, type, hostname, metadata, created_at, updated_at";

/// A row from the `assets` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    pub id: Uuid,
    pub tenant: String,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    pub hostname: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for an insert.
#[derive(Debug, Clone, Default)]
pub struct NewAsset {
    pub name: String,
    pub asset_type: Option<AssetType>,
    pub hostname: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct AssetChanges {
    pub name: Option<String>,
    pub asset_type: Option<AssetType>,
    pub hostname: Option<String>,
    pub metadata: Option<serde_json::Value>,
}
