// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend functionality for the `CoffeeCo` web server:
//! accounts, login tokens and static file serving.

pub mod assets;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::assets::FileServer;
use crate::auth::{AuthService, DefaultAuth};
use crate::config::Settings;
use crate::error::AppError;
use crate::storage::{SqliteStore, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Account operations
    pub auth: Arc<dyn AuthService>,
    /// Files under `/assets`
    pub assets: Arc<FileServer>,
    /// `index.html` and `manifest.json`
    pub site: Arc<FileServer>,
    /// Settings the server was started with
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state around an already opened store
    pub fn new(store: Arc<dyn UserStore>, settings: Settings) -> Self {
        let auth = Arc::new(DefaultAuth::new(store, settings.hash));
        Self {
            auth,
            assets: Arc::new(FileServer::new(settings.static_root.clone())),
            site: Arc::new(FileServer::new(settings.site_root.clone())),
            settings: Arc::new(settings),
        }
    }

    /// Open the database named in `settings` and build the state on it
    pub fn from_settings(settings: Settings) -> Result<Self, AppError> {
        let store = Arc::new(SqliteStore::open(&settings.database_path)?);
        Ok(Self::new(store, settings))
    }
}
