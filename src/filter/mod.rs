pub mod error;
pub mod filter_order;
pub mod filter_set;
pub mod filter_where;
pub mod params;
pub mod types;

pub use error::FilterError;
pub use filter_order::{FilterOrder, ASSET_SORT_COLUMNS, LOG_SORT_COLUMNS};
pub use filter_set::FilterSet;
pub use filter_where::FilterWhere;
pub use params::{fold_repeated_tags, AssetFilter, LogFilter, MAX_ASSET_LIMIT, MAX_LOG_LIMIT};
pub use types::*;
