// ============================
// crates/backend-lib/src/handlers/user.rs
// ============================
//! User account handlers.
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use coffeeco_common::{
    LoginRequest, NewUserRequest, PublicUser, UserId, UserIdResponse, LOGIN_COOKIE,
};
use zeroize::Zeroize;

use super::run_blocking;
use crate::error::AppError;
use crate::validation;
use crate::AppState;

/// `POST /api/user/add`
pub async fn add_user(
    State(state): State<Arc<AppState>>,
    Json(mut req): Json<NewUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(e) = validation::validate_new_user(&req) {
        req.password.zeroize();
        return Err(e.into());
    }

    let auth = state.auth.clone();
    let record = run_blocking(move || {
        let result = auth.create_user(&req.username, &req.password, &req.email);
        req.password.zeroize();
        result
    })
    .await?;

    Ok((StatusCode::CREATED, Json(UserIdResponse { id: record.id })))
}

/// `POST /api/user/login`: checks the password and sets the login cookie
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(mut req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = state.auth.clone();
    let id = req.id;
    let token = run_blocking(move || {
        let result = auth.login(id, &req.password);
        req.password.zeroize();
        result
    })
    .await?;

    let cookie = login_cookie(&token, state.settings.cookie_max_age_secs);
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        "Auth cookie added successfully",
    ))
}

/// `GET /api/user/authtoid`: resolves the login cookie to a user id
pub async fn auth_to_id(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserIdResponse>, AppError> {
    let token = cookie_value(&headers, LOGIN_COOKIE).ok_or(AppError::NoAuth)?;

    let auth = state.auth.clone();
    let id = run_blocking(move || auth.auth_to_user_id(&token))
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::NoAuth,
            other => other,
        })?;

    Ok(Json(UserIdResponse { id }))
}

/// `GET /api/user/getfromid/{id}`
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<UserId>,
) -> Result<Json<PublicUser>, AppError> {
    let auth = state.auth.clone();
    let record = run_blocking(move || auth.user_by_id(id)).await?;
    Ok(Json(PublicUser {
        id: record.id,
        username: record.username,
    }))
}

/// `GET /api/user/getfromusername/{username}`
pub async fn get_by_username(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<PublicUser>, AppError> {
    let auth = state.auth.clone();
    let record = run_blocking(move || auth.user_by_username(&username)).await?;
    Ok(Json(PublicUser {
        id: record.id,
        username: record.username,
    }))
}

fn login_cookie(token: &str, max_age_secs: u64) -> String {
    format!("{LOGIN_COOKIE}={token}; Max-Age={max_age_secs}; Path=/")
}

/// Value of the cookie called `name`, if the request carries one
pub(crate) fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
