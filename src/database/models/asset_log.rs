use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// `search_vector` is maintained by the database and never selected.
pub const ASSET_LOG_COLUMNS: &str = "id, asset_id, tenant, content, tags, created_at, updated_at";

/// A row from the `asset_logs` table.
///
/// `tenant` is the identity that wrote the log. It is stored on the row and
/// not re-derived from the parent asset when reading.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssetLog {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub tenant: String,
    pub content: String,
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for an insert. Tags are already normalized.
#[derive(Debug, Clone, Default)]
pub struct NewAssetLog {
    pub content: String,
    pub tags: Option<Vec<String>>,
}

/// Validated partial update. `Some(vec![])` clears tags; `None` keeps them.
#[derive(Debug, Clone, Default)]
pub struct AssetLogChanges {
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}
