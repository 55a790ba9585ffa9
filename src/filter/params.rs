use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::error::FilterError;
use super::filter_order::{FilterOrder, ASSET_SORT_COLUMNS, LOG_SORT_COLUMNS};
use super::types::FilterOrderInfo;

pub const MAX_ASSET_LIMIT: i64 = 100;
pub const MAX_LOG_LIMIT: i64 = 200;

const DEFAULT_SORT_BY: &str = "created_at";
const DEFAULT_SORT_ORDER: &str = "desc";

/// Pagination, sorting and filtering for asset listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssetFilter {
    pub limit: i64,
    pub offset: i64,
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    pub search: Option<String>,
    pub sort_by: String,
    pub sort_order: String,
}

impl AssetFilter {
    /// Fill and clamp values in place. Never fails; sort inputs are checked
    /// against the allow-list later, when the query is built.
    pub fn set_defaults(&mut self, default_limit: i64) {
        self.limit = clamp_limit(self.limit, default_limit, MAX_ASSET_LIMIT);
        self.offset = self.offset.max(0);
        fill_sort(&mut self.sort_by, &mut self.sort_order);
        drop_blank(&mut self.asset_type);
        drop_blank(&mut self.search);
    }

    /// Sort inputs resolved against `name`, `created_at`, `updated_at`.
    pub fn order(&self) -> Result<FilterOrderInfo, FilterError> {
        FilterOrder::validate_and_parse(&self.sort_by, &self.sort_order, ASSET_SORT_COLUMNS)
    }
}

/// Pagination, sorting and filtering for the logs of one asset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogFilter {
    pub limit: i64,
    pub offset: i64,
    /// Every listed tag must be present on a matching log.
    #[serde(deserialize_with = "comma_separated")]
    pub tags: Vec<String>,
    pub search: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub sort_by: String,
    pub sort_order: String,
}

impl LogFilter {
    pub fn set_defaults(&mut self, default_limit: i64) {
        self.limit = clamp_limit(self.limit, default_limit, MAX_LOG_LIMIT);
        self.offset = self.offset.max(0);
        fill_sort(&mut self.sort_by, &mut self.sort_order);
        drop_blank(&mut self.search);
    }

    /// Sort inputs resolved against `created_at`, `updated_at`.
    pub fn order(&self) -> Result<FilterOrderInfo, FilterError> {
        FilterOrder::validate_and_parse(&self.sort_by, &self.sort_order, LOG_SORT_COLUMNS)
    }
}

fn clamp_limit(limit: i64, default_limit: i64, max: i64) -> i64 {
    let limit = if limit <= 0 { default_limit } else { limit };
    limit.clamp(1, max)
}

fn fill_sort(sort_by: &mut String, sort_order: &mut String) {
    if sort_by.trim().is_empty() {
        *sort_by = DEFAULT_SORT_BY.to_string();
    }
    if sort_order.trim().is_empty() {
        *sort_order = DEFAULT_SORT_ORDER.to_string();
    }
}

fn drop_blank(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        *value = None;
    }
}

/// Rewrite repeated `tags` keys into the comma form the filter reads:
/// `tags=nginx&tags=ssl&limit=5` -> `limit=5&tags=nginx%2Cssl`.
pub fn fold_repeated_tags(raw_query: &str) -> String {
    let mut tags = Vec::new();
    let mut out = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in url::form_urlencoded::parse(raw_query.as_bytes()) {
        if key == "tags" {
            tags.push(value.into_owned());
        } else {
            out.append_pair(&key, &value);
        }
    }
    if !tags.is_empty() {
        out.append_pair("tags", &tags.join(","));
    }
    out.finish()
}

/// `tags=nginx,ssl` -> `["nginx", "ssl"]`
fn comma_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| {
            s.split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default())
}
