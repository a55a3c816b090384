// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::HashParams;

/// Prefix for environment overrides, e.g. `COFFEECO_BIND_ADDR`
pub const ENV_PREFIX: &str = "COFFEECO_";

const ONE_YEAR_SECS: u64 = 365 * 24 * 60 * 60;
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Directory served under `/assets`
    pub static_root: PathBuf,
    /// Directory holding `index.html` and `manifest.json`
    pub site_root: PathBuf,
    /// Log level
    pub log_level: String,
    /// Lifetime of the login cookie in seconds
    pub cookie_max_age_secs: u64,
    /// Password hashing cost
    pub hash: HashParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            database_path: PathBuf::from("data/coffeeco.sqlite"),
            static_root: PathBuf::from("dist/assets"),
            site_root: PathBuf::from("dist"),
            log_level: "info".to_string(),
            cookie_max_age_secs: ONE_YEAR_SECS,
            hash: HashParams::default(),
        }
    }
}

impl Settings {
    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("invalid log level '{}'", self.log_level);
        }
        if self.cookie_max_age_secs == 0 {
            bail!("cookie_max_age_secs must be greater than zero");
        }
        if !(1..=24).contains(&self.hash.log_n) {
            bail!("hash.log_n must be between 1 and 24, got {}", self.hash.log_n);
        }
        if let Err(e) = self.hash.to_scrypt() {
            bail!("{e}");
        }
        Ok(())
    }
}

/// Defaults overlaid with the file at `config_path`.
///
/// A `.json` extension selects the JSON provider, anything else is read as TOML.
/// A missing file contributes nothing.
pub fn settings_figment(config_path: &Path) -> Figment {
    let defaults = Figment::from(Serialized::defaults(Settings::default()));
    let is_json = config_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        defaults.merge(Json::file(config_path))
    } else {
        defaults.merge(Toml::file(config_path))
    }
}

/// Load settings: defaults, then the config file, then `COFFEECO_` environment
/// variables (nested keys split on `__`, e.g. `COFFEECO_HASH__LOG_N`).
pub fn load_settings(config_path: &Path) -> Result<Settings> {
    let settings = settings_figment(config_path)
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;

    Ok(settings)
}
