// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const USER_CREATED: &str = "user.created";
pub const LOGIN_SUCCESS: &str = "login.success";
pub const LOGIN_FAILURE: &str = "login.failure";
pub const ASSET_SERVED: &str = "asset.served";
pub const ASSET_MISSING: &str = "asset.missing";
pub const ASSET_BLOCKED: &str = "asset.blocked";
pub const ASSET_CACHE_HIT: &str = "asset.cache_hit";
