//! SQLite database wrapper with versioned migrations

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::info;

/// Current schema version
const SCHEMA_VERSION: i32 = 2;

/// Database shared between request handlers
pub type SharedDatabase = Arc<Mutex<Database>>;

/// SQLite database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database at the given path
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL lets the CLI read leads while the server is writing
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Wrap for sharing across threads
    pub fn shared(self) -> SharedDatabase {
        Arc::new(Mutex::new(self))
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Current schema version recorded in the database
    pub(crate) fn get_schema_version(&self) -> i32 {
        if let Err(e) = self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        ) {
            tracing::warn!("Failed to create schema_version table: {}", e);
            return 0;
        }

        self.conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0)
    }

    fn set_schema_version(&self, version: i32) -> Result<()> {
        self.conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
        Ok(())
    }

    /// Run database migrations incrementally
    pub(crate) fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version();
        info!(
            "Database schema version: {} (target: {})",
            current_version, SCHEMA_VERSION
        );

        if current_version >= SCHEMA_VERSION {
            return Ok(());
        }

        // Migration 1: Leads table
        if current_version < 1 {
            info!("Running migration 1: Leads table");
            self.conn.execute_batch(
                r#"
                -- One row per submitted form; payload is the submitted JSON object
                CREATE TABLE IF NOT EXISTS leads (
                    id TEXT PRIMARY KEY,
                    payload TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );
                "#,
            )?;
            self.set_schema_version(1)?;
        }

        // Migration 2: Index for newest-first listing
        if current_version < 2 {
            info!("Running migration 2: Lead ordering index");
            self.conn.execute_batch(
                "CREATE INDEX IF NOT EXISTS idx_leads_created ON leads(created_at DESC);",
            )?;
            self.set_schema_version(2)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_db() -> (Database, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("nested").join("test.db");
        let db = Database::new(&db_path).expect("Failed to create database");
        (db, temp_dir)
    }

    #[test]
    fn test_database_creation() {
        let (db, _temp) = create_test_db();
        assert_eq!(db.get_schema_version(), SCHEMA_VERSION);
    }

    #[test]
    fn test_leads_table_columns() {
        let (db, _temp) = create_test_db();
        let mut stmt = db
            .conn()
            .prepare("PRAGMA table_info(leads)")
            .expect("Failed to prepare PRAGMA");
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("Failed to get columns")
            .filter_map(|column| column.ok())
            .collect();
        assert_eq!(columns, vec!["id", "payload", "created_at"]);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        drop(Database::new(&db_path).expect("first open"));

        let db = Database::new(&db_path).expect("second open");
        let applied: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .expect("count versions");
        assert_eq!(applied, i64::from(SCHEMA_VERSION));
    }
}
