// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Storage abstraction with a SQLite implementation.
//!
//! The store is opened once at process start and handed to every component
//! that needs it; nothing here lives in a global.
use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::auth::HashParams;
use crate::error::AppError;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
        username      TEXT NOT NULL,
        email         TEXT NOT NULL,
        password_hash BLOB NOT NULL,
        salt          BLOB NOT NULL,
        auth_token    TEXT NOT NULL,
        hash_log_n    INTEGER NOT NULL,
        hash_r        INTEGER NOT NULL,
        hash_p        INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);
    CREATE INDEX IF NOT EXISTS idx_users_auth_token ON users(auth_token);
";

const USER_COLUMNS: &str =
    "id, username, email, password_hash, salt, auth_token, hash_log_n, hash_r, hash_p";

/// A persisted user row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Salted password hash, stored as a raw blob
    pub password_hash: Vec<u8>,
    /// Per-user random salt, fixed at creation
    pub salt: Vec<u8>,
    pub auth_token: String,
    /// scrypt cost the hash and token were derived with
    pub hash_params: HashParams,
}

/// A user row that has not been assigned an id yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: Vec<u8>,
    pub salt: Vec<u8>,
    pub auth_token: String,
    pub hash_params: HashParams,
}

/// Trait for user storage backends
pub trait UserStore: Send + Sync {
    /// Insert `user` unless a row with the same username exists.
    /// Returns the new id, or `None` when the username is taken.
    fn insert_user_if_absent(&self, user: &NewUser) -> Result<Option<i64>, AppError>;

    /// Fetch a user by id
    fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, AppError>;

    /// Fetch a user by exact username
    fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError>;

    /// Fetch the user whose stored token equals `token` byte for byte
    fn find_by_auth_token(&self, token: &str) -> Result<Option<UserRecord>, AppError>;
}

/// SQLite implementation of the `UserStore` trait.
///
/// A single connection is shared by all callers; the mutex serializes access.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "opened user database");
        Self::with_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, AppError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, AppError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn find_one(
        &self,
        column: &str,
        value: &dyn rusqlite::ToSql,
    ) -> Result<Option<UserRecord>, AppError> {
        let conn = self.conn.lock();
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");
        let record = conn
            .query_row(&sql, params![value], user_from_row)
            .optional()?;
        Ok(record)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        salt: row.get(4)?,
        auth_token: row.get(5)?,
        hash_params: HashParams {
            log_n: row.get(6)?,
            r: row.get(7)?,
            p: row.get(8)?,
        },
    })
}

impl UserStore for SqliteStore {
    fn insert_user_if_absent(&self, user: &NewUser) -> Result<Option<i64>, AppError> {
        // Check and insert under one lock so two sign-ups cannot both pass the check.
        let conn = self.conn.lock();
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE username = ?1",
                params![user.username],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Ok(None);
        }

        conn.execute(
            "INSERT INTO users
                 (username, email, password_hash, salt, auth_token, hash_log_n, hash_r, hash_p)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user.username,
                user.email,
                user.password_hash,
                user.salt,
                user.auth_token,
                user.hash_params.log_n,
                user.hash_params.r,
                user.hash_params.p
            ],
        )?;
        Ok(Some(conn.last_insert_rowid()))
    }

    fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, AppError> {
        self.find_one("id", &id)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        self.find_one("username", &username)
    }

    fn find_by_auth_token(&self, token: &str) -> Result<Option<UserRecord>, AppError> {
        self.find_one("auth_token", &token)
    }
}
