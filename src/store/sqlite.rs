//! SQLite credential store backend.
//!
//! Persists users in a single `users` table. The schema is created on open,
//! and seeding is an upsert so repeated startups with the same configured
//! users are idempotent. Username lookups rely on SQLite's default BINARY
//! collation, keeping them case-sensitive.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use super::{CredentialStore, Role, StoreError, UserRecord};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS users (
    username      TEXT PRIMARY KEY NOT NULL,
    display_name  TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'user',
    email         TEXT
)";

/// Credential store backed by a SQLite database file.
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) a database file and ensure the schema exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        info!("Opening credential store at {:?}", path);

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Backend(e.to_string()))?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        // A pooled in-memory database needs exactly one long-lived
        // connection; a second connection would see a different database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert or replace a user record, keyed by its exact username.
    pub async fn upsert(&self, record: &UserRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (username, display_name, password_hash, role, email)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(username) DO UPDATE SET
                 display_name = excluded.display_name,
                 password_hash = excluded.password_hash,
                 role = excluded.role,
                 email = excluded.email",
        )
        .bind(&record.username)
        .bind(&record.display_name)
        .bind(&record.password_hash)
        .bind(record.role.as_str())
        .bind(&record.email)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Number of stored users.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    fn record_from_row(
        row: (String, String, String, String, Option<String>),
    ) -> Result<UserRecord, StoreError> {
        let (username, display_name, password_hash, role, email) = row;
        let role = Role::from_str(&role).map_err(StoreError::Corrupt)?;

        let mut record = UserRecord::new(username, display_name, password_hash).with_role(role);
        record.email = email;
        Ok(record)
    }
}

#[async_trait::async_trait]
impl CredentialStore for SqliteStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        // Default BINARY collation: no COLLATE NOCASE here, the match is
        // case-sensitive by contract
        let row: Option<(String, String, String, String, Option<String>)> = sqlx::query_as(
            "SELECT username, display_name, password_hash, role, email
             FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::record_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let rows: Vec<(String, String, String, String, Option<String>)> = sqlx::query_as(
            "SELECT username, display_name, password_hash, role, email
             FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::record_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(username: &str, role: Role) -> UserRecord {
        UserRecord::new(username, format!("{username} display"), "$argon2id$stub")
            .with_role(role)
    }

    #[tokio::test]
    async fn test_open_in_memory_and_roundtrip() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store.upsert(&sample("admin", Role::Admin)).await.unwrap();

        let found = store.find_by_username("admin").await.unwrap().unwrap();
        assert_eq!(found.username, "admin");
        assert_eq!(found.display_name, "admin display");
        assert_eq!(found.role, Role::Admin);
        assert_eq!(found.email, None);
    }

    #[tokio::test]
    async fn test_find_absent_user() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        assert!(store.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store.upsert(&sample("admin", Role::Admin)).await.unwrap();

        assert!(store.find_by_username("Admin").await.unwrap().is_none());
        assert!(store.find_by_username("ADMIN").await.unwrap().is_none());
        assert!(store.find_by_username("admin").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store.upsert(&sample("alice", Role::User)).await.unwrap();
        store.upsert(&sample("alice", Role::Admin)).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let record = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(record.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_email_roundtrip() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let record = sample("carol", Role::User).with_email("carol@example.com");
        store.upsert(&record).await.unwrap();

        let found = store.find_by_username("carol").await.unwrap().unwrap();
        assert_eq!(found.email, Some("carol@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_list_sorted_by_username() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store.upsert(&sample("carol", Role::User)).await.unwrap();
        store.upsert(&sample("alice", Role::Admin)).await.unwrap();
        store.upsert(&sample("bob", Role::User)).await.unwrap();

        let records = store.list().await.unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_unknown_role_text_is_corrupt() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store.upsert(&sample("broken", Role::User)).await.unwrap();

        sqlx::query("UPDATE users SET role = 'root' WHERE username = ?")
            .bind("broken")
            .execute(&store.pool)
            .await
            .unwrap();

        let result = store.find_by_username("broken").await;
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("users.db");

        {
            let store = SqliteStore::open(&db_path).await.unwrap();
            store.upsert(&sample("admin", Role::Admin)).await.unwrap();
        }

        // Reopen: schema init must not clobber existing rows
        let store = SqliteStore::open(&db_path).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.find_by_username("admin").await.unwrap().is_some());
    }
}
