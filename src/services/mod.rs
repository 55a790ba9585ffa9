pub mod asset_service;
pub mod log_service;

pub use asset_service::AssetService;
pub use log_service::LogService;
