use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid sort column: {0}")]
    InvalidSortColumn(String),

    #[error("invalid sort order: {0} (expected asc or desc)")]
    InvalidSortOrder(String),
}
