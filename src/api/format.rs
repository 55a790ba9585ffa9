use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Asset, AssetLog};

/// Public shape of an asset. The owning tenant is never echoed back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Asset> for AssetResponse {
    fn from(asset: Asset) -> Self {
        Self {
            id: asset.id,
            name: asset.name,
            asset_type: asset.asset_type,
            hostname: asset.hostname,
            metadata: asset.metadata,
            created_at: asset.created_at,
            updated_at: asset.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogResponse {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub content: String,
    /// Absent when never set; `[]` when explicitly cleared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AssetLog> for LogResponse {
    fn from(log: AssetLog) -> Self {
        Self {
            id: log.id,
            asset_id: log.asset_id,
            content: log.content,
            tags: log.tags,
            created_at: log.created_at,
            updated_at: log.updated_at,
        }
    }
}

/// One page of results plus the total across all pages.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new<R>(rows: Vec<R>, total: i64, limit: i64, offset: i64) -> Self
    where
        R: Into<T>,
    {
        Self {
            items: rows.into_iter().map(Into::into).collect(),
            total,
            limit,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn asset(metadata: Option<serde_json::Value>) -> Asset {
        let now = Utc::now();
        Asset {
            id: Uuid::nil(),
            tenant: "alice".into(),
            name: "prod-server".into(),
            asset_type: Some("server".into()),
            hostname: None,
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn asset_hides_tenant_and_absent_fields() {
        let v = serde_json::to_value(AssetResponse::from(asset(None))).unwrap();
        assert!(v.get("tenant").is_none());
        assert!(v.get("hostname").is_none());
        assert!(v.get("metadata").is_none());
        assert_eq!(v["type"], "server");
    }

    #[test]
    fn empty_metadata_round_trips() {
        let v = serde_json::to_value(AssetResponse::from(asset(Some(json!({}))))).unwrap();
        assert_eq!(v["metadata"], json!({}));
    }

    #[test]
    fn nil_and_empty_tags_differ() {
        let now = Utc::now();
        let mut log = AssetLog {
            id: Uuid::nil(),
            asset_id: Uuid::nil(),
            tenant: "alice".into(),
            content: "Fixed SSL issue".into(),
            tags: None,
            created_at: now,
            updated_at: now,
        };
        let v = serde_json::to_value(LogResponse::from(log.clone())).unwrap();
        assert!(v.get("tags").is_none());

        log.tags = Some(vec![]);
        let v = serde_json::to_value(LogResponse::from(log)).unwrap();
        assert_eq!(v["tags"], json!([]));
    }

    #[test]
    fn list_response_shape() {
        let page: ListResponse<AssetResponse> = ListResponse::new(vec![asset(None)], 7, 1, 3);
        let v = serde_json::to_value(page).unwrap();
        assert_eq!(v["total"], 7);
        assert_eq!(v["limit"], 1);
        assert_eq!(v["offset"], 3);
        assert_eq!(v["items"].as_array().map(Vec::len), Some(1));
    }
}
