use super::error::FilterError;
use super::types::{FilterOrderInfo, SortDirection};

pub const ASSET_SORT_COLUMNS: &[&str] = &["name", "created_at", "updated_at"];
pub const LOG_SORT_COLUMNS: &[&str] = &["created_at", "updated_at"];

pub struct FilterOrder;

impl FilterOrder {
    /// Resolve caller-supplied sort inputs against an allow-list. The returned
    /// column is the allow-list's own entry, never the caller's string.
    pub fn validate_and_parse(
        sort_by: &str,
        sort_order: &str,
        allowed: &'static [&'static str],
    ) -> Result<FilterOrderInfo, FilterError> {
        let column = allowed
            .iter()
            .copied()
            .find(|c| *c == sort_by)
            .ok_or_else(|| FilterError::InvalidSortColumn(sort_by.to_string()))?;

        let sort = if sort_order.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else if sort_order.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            return Err(FilterError::InvalidSortOrder(sort_order.to_string()));
        };

        Ok(FilterOrderInfo { column, sort })
    }

    /// `id` breaks ties so pages are stable when timestamps collide.
    pub fn generate(info: &FilterOrderInfo) -> String {
        format!("ORDER BY {} {}, id {}", info.column, info.sort.to_sql(), info.sort.to_sql())
    }
}
