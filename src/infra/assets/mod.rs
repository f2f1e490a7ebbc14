pub mod fs_asset_store;
