pub mod format;
pub mod request;

pub use format::{AssetResponse, ListResponse, LogResponse};
pub use request::{CreateAssetRequest, CreateLogRequest, UpdateAssetRequest, UpdateLogRequest};
