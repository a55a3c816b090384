// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP routing table.
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{assets, user};
use crate::AppState;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(assets::index))
        .route("/login", get(assets::index))
        .route("/signup", get(assets::index))
        .route("/about", get(assets::index))
        .route("/users/{name}", get(assets::index))
        .route("/manifest.json", get(assets::manifest))
        .route("/assets/{*path}", get(assets::serve_asset))
        // User API
        .route("/api/user/add", post(user::add_user))
        .route("/api/user/login", post(user::login))
        .route("/api/user/authtoid", get(user::auth_to_id))
        .route("/api/user/getfromid/{id}", get(user::get_by_id))
        .route("/api/user/getfromusername/{username}", get(user::get_by_username))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
