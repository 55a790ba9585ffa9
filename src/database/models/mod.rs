pub mod asset;
pub mod asset_log;

pub use asset::{Asset, AssetChanges, NewAsset, ASSET_COLUMNS};
pub use asset_log::{AssetLog, AssetLogChanges, NewAssetLog, ASSET_LOG_COLUMNS};
