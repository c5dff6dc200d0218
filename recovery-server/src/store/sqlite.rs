//! SQLite-based storage implementation

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use recovery_core::{RecoveryError, RecoveryRequest, User, UserId, UserStatus};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{AccountStore, RecoveryRequestStore, StoreResult, UserStore};

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

const USER_COLUMNS: &str = "u.id, u.name, u.email, u.status, r.token, r.expiry_date";

/// SQLite-based store implementing both UserStore and RecoveryRequestStore
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

fn storage_err(e: rusqlite::Error) -> RecoveryError {
    RecoveryError::Storage(e.to_string())
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Read a Unix-millis column, failing the row on values chrono cannot represent
fn datetime_column(idx: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp out of range: {}", millis).into(),
        )
    })
}

fn status_column(idx: usize, status: &str) -> rusqlite::Result<UserStatus> {
    UserStatus::from_str(status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown user status: {}", status).into(),
        )
    })
}

/// Map a `users LEFT JOIN recovery_requests` row selected with USER_COLUMNS
fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let id = UserId(row.get::<_, i64>(0)? as u64);
    let status: String = row.get(3)?;
    let token: Option<String> = row.get(4)?;
    let expiry: Option<i64> = row.get(5)?;

    let recovery_request = match (token, expiry) {
        (Some(token), Some(expiry)) => Some(RecoveryRequest {
            user_id: id,
            token,
            expiry_date: datetime_column(5, expiry)?,
        }),
        _ => None,
    };

    Ok(User {
        id,
        name: row.get(1)?,
        email: row.get(2)?,
        status: status_column(3, &status)?,
        recovery_request,
    })
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path
    pub fn open(path: &str) -> Result<Self, RecoveryError> {
        let conn = Connection::open(path).map_err(storage_err)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, RecoveryError> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, RecoveryError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(storage_err)?;

        Self::migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run database migrations
    fn migrate(conn: &Connection) -> Result<(), RecoveryError> {
        let current_version = Self::get_schema_version(conn)?;

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                current = current_version,
                target = SCHEMA_VERSION,
                "Running database migrations"
            );

            if current_version < 1 {
                Self::migrate_v1(conn)?;
            }

            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .map_err(storage_err)?;

            tracing::info!("Database migrations complete");
        }

        Ok(())
    }

    /// Get current schema version (0 if no schema exists)
    fn get_schema_version(conn: &Connection) -> Result<i32, RecoveryError> {
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(storage_err)?;

        if !table_exists {
            return Ok(0);
        }

        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0).map(|v| v.unwrap_or(0))
        })
        .map_err(storage_err)
    }

    /// Migration to version 1: initial schema
    fn migrate_v1(conn: &Connection) -> Result<(), RecoveryError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                status TEXT NOT NULL,
                password_hash TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );

            -- At most one outstanding request per user
            CREATE TABLE IF NOT EXISTS recovery_requests (
                token TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                expiry_date INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_recovery_expiry ON recovery_requests(expiry_date);
            "#,
        )
        .map_err(storage_err)?;

        Ok(())
    }
}

impl UserStore for SqliteStore {
    fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let normalized = email.to_lowercase();
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            &format!(
                "SELECT {USER_COLUMNS} FROM users u
                 LEFT JOIN recovery_requests r ON r.user_id = u.id
                 WHERE u.email = ?1"
            ),
            params![normalized],
            user_from_row,
        )
        .optional()
        .map_err(storage_err)
    }
}

impl AccountStore for SqliteStore {
    fn create_user(&self, name: &str, email: &str, status: UserStatus) -> StoreResult<UserId> {
        let normalized = email.to_lowercase();
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO users (name, email, status, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, normalized, status.as_str(), now],
        )
        .map_err(storage_err)?;

        let id = conn.last_insert_rowid() as u64;
        Ok(UserId(id))
    }

    fn update_password(&self, user_id: UserId, password_hash: &str) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        let rows_affected = conn
            .execute(
                "UPDATE users SET password_hash = ?1 WHERE id = ?2",
                params![password_hash, user_id.0 as i64],
            )
            .map_err(storage_err)?;

        if rows_affected == 0 {
            return Err(RecoveryError::UserNotFound);
        }

        Ok(())
    }

    fn password_hash(&self, user_id: UserId) -> StoreResult<Option<String>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT password_hash FROM users WHERE id = ?1",
            params![user_id.0 as i64],
            |row| row.get(0),
        )
        .optional()
        .map_err(storage_err)
    }
}

impl RecoveryRequestStore for SqliteStore {
    fn find_by_token(&self, token: &str) -> StoreResult<Option<RecoveryRequest>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT token, user_id, expiry_date FROM recovery_requests WHERE token = ?1",
            params![token],
            |row| {
                let user_id: i64 = row.get(1)?;
                let expiry: i64 = row.get(2)?;
                Ok(RecoveryRequest {
                    token: row.get(0)?,
                    user_id: UserId(user_id as u64),
                    expiry_date: datetime_column(2, expiry)?,
                })
            },
        )
        .optional()
        .map_err(storage_err)
    }

    fn save(&self, request: &RecoveryRequest) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO recovery_requests (token, user_id, expiry_date) VALUES (?1, ?2, ?3)",
            params![
                request.token,
                request.user_id.0 as i64,
                request.expiry_date.timestamp_millis(),
            ],
        )
        .map_err(|e| {
            // UNIQUE(user_id) losing a race with a concurrent request
            if is_unique_violation(&e) {
                return RecoveryError::InvalidEmailState;
            }
            storage_err(e)
        })?;

        Ok(())
    }

    fn delete(&self, request: &RecoveryRequest) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();

        let rows_affected = conn
            .execute(
                "DELETE FROM recovery_requests WHERE token = ?1",
                params![request.token],
            )
            .map_err(storage_err)?;

        Ok(rows_affected > 0)
    }

    fn delete_all_expired_password_reset_tokens(&self) -> StoreResult<u64> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().timestamp_millis();

        let rows_affected = conn
            .execute(
                "DELETE FROM recovery_requests WHERE expiry_date < ?1",
                params![now],
            )
            .map_err(storage_err)?;

        Ok(rows_affected as u64)
    }
}
