//! Database operations for diaries, comments and safety events.
//!
//! This module provides SQLite storage behind an r2d2 connection pool. Every
//! pooled connection enables foreign keys and a busy timeout when acquired, so
//! concurrent writers wait for each other instead of failing outright.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions and schema initialization
//! - `diaries`: Minimal diary records (insert and lookup)
//! - `comments`: One-comment-per-diary upsert and lookup
//! - `safety_events`: Append-only audit trail
//! - `store`: Store traits consumed by the comment pipeline
//!
//! # Example
//!
//! ```no_run
//! use solace::db::Database;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/solace.db"))?;
//! db.initialize_schema()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod comments;
pub mod diaries;
pub mod safety_events;
pub mod schema;
pub mod store;

use crate::constants::{DB_BUSY_TIMEOUT_MS, DB_POOL_MAX_SIZE, SQLITE_TIMESTAMP_FORMAT};
use crate::errors::{AppResult, DatabaseError};
use chrono::NaiveDateTime;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub use store::{CommentStore, SafetyEventStore};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database handle with connection pooling.
#[derive(Clone)]
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens or creates the SQLite database at `db_path`.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent directory cannot be created
    /// - Database file cannot be opened
    /// - Connection pool cannot be initialized
    pub fn open(db_path: &Path) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(DB_POOL_MAX_SIZE)
            .connection_customizer(Box::new(ConnectionPragmas {
                busy_timeout: Duration::from_millis(DB_BUSY_TIMEOUT_MS),
            }))
            .build(manager)
            .map_err(DatabaseError::Pool)?;

        // Test the connection
        let conn = pool.get().map_err(DatabaseError::Pool)?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(DatabaseError::Sqlite)?;
        drop(conn);

        info!("Database opened successfully");
        Ok(Database { pool })
    }

    /// Gets a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the pool is exhausted.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| DatabaseError::Pool(e).into())
    }

    /// Initializes the database schema.
    ///
    /// Idempotent and safe to call multiple times.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    pub fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;
        info!("Database schema initialized");
        Ok(())
    }
}

/// Connection customizer applied to every pooled connection.
#[derive(Debug)]
struct ConnectionPragmas {
    busy_timeout: Duration,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(())
    }

    fn on_release(&self, _conn: Connection) {}
}

/// Parses a `CURRENT_TIMESTAMP` column value, mapping failures to a row error.
pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> Result<NaiveDateTime, rusqlite::Error> {
    NaiveDateTime::parse_from_str(raw, SQLITE_TIMESTAMP_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
