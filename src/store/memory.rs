//! In-memory credential store backend.
//!
//! Backs the store trait with a `HashMap` guarded by an `RwLock`. Intended
//! for tests and small single-process deployments where the user list is
//! seeded from configuration at startup.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{CredentialStore, StoreError, UserRecord};

/// Credential store backed by an in-process map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given records.
    pub fn with_users(records: Vec<UserRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Insert or replace a record, keyed by its exact username.
    pub fn insert(&self, record: UserRecord) {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        users.insert(record.username.clone(), record);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        users.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        Ok(users.get(username).cloned())
    }

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        let mut records: Vec<UserRecord> = users.values().cloned().collect();
        records.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(records)
    }
}
