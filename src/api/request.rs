//! Request bodies as they arrive on the wire.
//!
//! `null` and a missing key both deserialize to `None`, which the update
//! paths treat as "leave unchanged". `metadata` is kept raw so the object
//! check can look at the exact bytes the client sent.

use serde::Deserialize;
use serde_json::value::RawValue;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssetRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "type", default)]
    pub asset_type: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub hostname: Option<String>,
    #[serde(default)]
    pub metadata: Option<Box<RawValue>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAssetRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub asset_type: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub hostname: Option<String>,
    #[serde(default)]
    pub metadata: Option<Box<RawValue>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLogRequest {
    #[validate(length(min = 2, max = 10000))]
    pub content: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateLogRequest {
    #[serde(default)]
    #[validate(length(min = 2, max = 10000))]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}
