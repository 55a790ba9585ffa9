//! Input checks that sit in front of the data layer.
//!
//! Declarative length rules live on the request DTOs (`validator` derive); the
//! helpers here cover what those attributes cannot express.

use std::collections::HashSet;
use std::str::FromStr;

use validator::Validate;

use crate::error::{ApiError, FieldError};

pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LEN: usize = 50;

/// Classification of a tracked asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    Server,
    Vm,
    Nas,
    Container,
    Network,
    Other,
}

impl AssetType {
    pub const ALL: [AssetType; 6] = [
        AssetType::Server,
        AssetType::Vm,
        AssetType::Nas,
        AssetType::Container,
        AssetType::Network,
        AssetType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Server => "server",
            AssetType::Vm => "vm",
            AssetType::Nas => "nas",
            AssetType::Container => "container",
            AssetType::Network => "network",
            AssetType::Other => "other",
        }
    }
}

impl FromStr for AssetType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = AssetType::ALL.iter().map(AssetType::as_str).collect();
                ApiError::bad_request(format!(
                    "invalid asset type '{}' (expected one of: {})",
                    s,
                    allowed.join(", ")
                ))
            })
    }
}

/// Run the derive-based rules on a request DTO.
pub fn validate_request<T: Validate>(request: &T) -> Result<(), ApiError> {
    request.validate().map_err(ApiError::from)
}

/// `None` is accepted; anything else must name a known asset type.
pub fn validate_asset_type(value: Option<&str>) -> Result<Option<AssetType>, ApiError> {
    value.map(AssetType::from_str).transpose()
}

/// `None` is accepted; otherwise the payload must parse as JSON and be an object.
pub fn validate_json_object(raw: Option<&str>) -> Result<Option<serde_json::Value>, ApiError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ApiError::bad_request(format!("metadata must be valid JSON: {}", e)))?;
    if !raw.trim_start().starts_with('{') {
        return Err(ApiError::bad_request("metadata must be a JSON object"));
    }
    Ok(Some(value))
}

/// Trim, lowercase, drop empties and de-duplicate (first occurrence wins).
/// Used as-is for tag filters, which must keep every requested tag.
pub fn clean_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// [`clean_tags`] plus the cap of [`MAX_TAGS`] stored tags. `None` stays
/// `None`; an empty list stays an empty list.
pub fn normalize_tags(tags: Option<&[String]>) -> Option<Vec<String>> {
    let mut tags = clean_tags(tags?);
    tags.truncate(MAX_TAGS);
    Some(tags)
}

/// Per-tag length limit, checked on normalized tags.
pub fn validate_tag_lengths(tags: Option<&[String]>) -> Result<(), ApiError> {
    let Some(tags) = tags else {
        return Ok(());
    };
    let field_errors: Vec<FieldError> = tags
        .iter()
        .filter(|t| t.chars().count() > MAX_TAG_LEN)
        .map(|t| {
            FieldError::new(
                "tags",
                format!("tag '{}' must be at most {} characters", t, MAX_TAG_LEN),
            )
        })
        .collect();
    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Validation failed", field_errors))
    }
}
