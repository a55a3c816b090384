//! Reading, compressing and fingerprinting static files.
//!
//! Compressed bodies are cached per resolved path and reused until the file's
//! modification time or length changes on disk.
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Bytes;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use flate2::{write::GzEncoder, Compression};
use metrics::counter;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use crate::assets::path::resolve;
use crate::error::AppError;
use crate::metrics::{ASSET_BLOCKED, ASSET_CACHE_HIT, ASSET_MISSING, ASSET_SERVED};

/// Result of serving one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedFile {
    /// Gzip-compressed file contents; empty when the file could not be read
    pub content: Bytes,
    pub status: StatusCode,
    /// Hex SHA-256 of the uncompressed contents
    pub etag: Option<String>,
    /// File modification time, truncated to whole seconds
    pub last_modified: Option<DateTime<Utc>>,
}

impl ServedFile {
    fn missing() -> Self {
        Self {
            content: Bytes::new(),
            status: StatusCode::NOT_FOUND,
            etag: None,
            last_modified: None,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedFile {
    content: Bytes,
    etag: String,
    modified: SystemTime,
    len: u64,
}

impl CachedFile {
    fn is_fresh(&self, modified: SystemTime, len: u64) -> bool {
        self.modified == modified && self.len == len
    }

    fn to_served(&self) -> ServedFile {
        ServedFile {
            content: self.content.clone(),
            status: StatusCode::OK,
            etag: Some(self.etag.clone()),
            last_modified: http_time(self.modified),
        }
    }
}

/// Serves files from beneath a single root directory
#[derive(Debug)]
pub struct FileServer {
    root: PathBuf,
    cache: RwLock<HashMap<PathBuf, CachedFile>>,
}

impl FileServer {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of files currently held in the compressed cache
    pub fn cached_entries(&self) -> usize {
        self.cache.read().len()
    }

    /// Resolve `requested` under the root, read it and gzip it.
    ///
    /// A path outside the root is an error; a file that cannot be read is a 404.
    pub fn serve(&self, requested: &str) -> Result<ServedFile, AppError> {
        let path = match resolve(requested, &self.root) {
            Ok(path) => path,
            Err(e) => {
                counter!(ASSET_BLOCKED).increment(1);
                tracing::warn!(requested, root = %self.root.display(), "blocked path outside static root");
                return Err(e);
            },
        };

        let (modified, len) = match std::fs::metadata(&path).and_then(|m| {
            if m.is_file() {
                Ok((m.modified()?, m.len()))
            } else {
                Err(std::io::Error::other("not a regular file"))
            }
        }) {
            Ok(stat) => stat,
            Err(e) => return Ok(self.missing(&path, &e)),
        };

        if let Some(cached) = self.cache.read().get(&path) {
            if cached.is_fresh(modified, len) {
                counter!(ASSET_CACHE_HIT).increment(1);
                counter!(ASSET_SERVED).increment(1);
                return Ok(cached.to_served());
            }
        }

        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(e) => return Ok(self.missing(&path, &e)),
        };

        let cached = CachedFile {
            etag: etag_for(&raw),
            content: Bytes::from(gzip(&raw)?),
            modified,
            len,
        };
        counter!(ASSET_SERVED).increment(1);
        tracing::debug!(path = %path.display(), raw = raw.len(), compressed = cached.content.len(), "compressed file");

        let served = cached.to_served();
        self.cache.write().insert(path, cached);
        Ok(served)
    }

    fn missing(&self, path: &Path, error: &std::io::Error) -> ServedFile {
        counter!(ASSET_MISSING).increment(1);
        tracing::warn!(path = %path.display(), error = %error, "couldn't read the file");
        self.cache.write().remove(path);
        ServedFile::missing()
    }
}

/// Gzip `bytes` at the default level
pub fn gzip(bytes: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Content fingerprint used as the HTTP entity tag
pub fn etag_for(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// HTTP dates carry whole seconds only
fn http_time(modified: SystemTime) -> Option<DateTime<Utc>> {
    let secs = modified.duration_since(UNIX_EPOCH).ok()?.as_secs();
    DateTime::from_timestamp(i64::try_from(secs).ok()?, 0)
}
