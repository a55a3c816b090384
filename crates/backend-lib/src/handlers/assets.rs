//! Static asset and page handlers.
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use super::run_blocking;
use crate::assets::{mime_for, FileServer, ServedFile};
use crate::error::AppError;
use crate::AppState;

/// Assets are fingerprinted by the bundler, so a day is safe
pub const ASSET_CACHE_CONTROL: &str = "must-revalidate, max-age=86400";
/// Pages and the manifest change with every release
pub const PAGE_CACHE_CONTROL: &str = "must-revalidate, public, max-age=604800";

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

const INDEX_FILE: &str = "index.html";
const MANIFEST_FILE: &str = "manifest.json";

/// `GET /assets/{*path}`
pub async fn serve_asset(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let mime = mime_for(&path);
    let served = serve_from(state.assets.clone(), path).await?;
    Ok(file_response(served, &mime, ASSET_CACHE_CONTROL, &headers))
}

/// Client-side routes all load the same page
pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let served = serve_from(state.site.clone(), INDEX_FILE.to_string()).await?;
    Ok(file_response(served, "text/html", PAGE_CACHE_CONTROL, &headers))
}

/// `GET /manifest.json`
pub async fn manifest(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let served = serve_from(state.site.clone(), MANIFEST_FILE.to_string()).await?;
    Ok(file_response(
        served,
        "application/json",
        PAGE_CACHE_CONTROL,
        &headers,
    ))
}

async fn serve_from(server: Arc<FileServer>, requested: String) -> Result<ServedFile, AppError> {
    run_blocking(move || server.serve(&requested)).await
}

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn http_date(time: DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

/// `If-None-Match` decides when present; otherwise `If-Modified-Since` is compared
/// against the file's modification time.
fn is_not_modified(served: &ServedFile, etag: Option<&str>, request_headers: &HeaderMap) -> bool {
    if let Some(candidates) = request_headers.get(header::IF_NONE_MATCH) {
        return match (etag, candidates.to_str()) {
            (Some(etag), Ok(candidates)) => candidates
                .split(',')
                .any(|candidate| candidate.trim() == etag || candidate.trim() == "*"),
            _ => false,
        };
    }

    let since = request_headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_http_date);
    match (served.last_modified, since) {
        (Some(modified), Some(since)) => modified <= since,
        _ => false,
    }
}

/// Build the HTTP response for a served file, honouring conditional request headers
pub fn file_response(
    served: ServedFile,
    mime: &str,
    cache_control: &'static str,
    request_headers: &HeaderMap,
) -> Response {
    if served.status != StatusCode::OK {
        return served.status.into_response();
    }

    let etag = served.etag.as_deref().map(|tag| format!("\"{tag}\""));
    let not_modified = is_not_modified(&served, etag.as_deref(), request_headers);

    let mut response = if not_modified {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        Response::new(Body::from(served.content))
    };
    let headers = response.headers_mut();
    if !not_modified {
        headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        if let Ok(value) = HeaderValue::from_str(mime) {
            headers.insert(header::CONTENT_TYPE, value);
        }
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));
    if let Some(value) = etag.and_then(|tag| HeaderValue::from_str(&tag).ok()) {
        headers.insert(header::ETAG, value);
    }
    if let Some(modified) = served.last_modified {
        if let Ok(value) = HeaderValue::from_str(&http_date(modified)) {
            headers.insert(header::LAST_MODIFIED, value);
        }
    }
    response
}
