// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Embedded user store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: record id → serialized StoredUser (JSON bytes)
//! - `username_index`: display name → record id
//! - `email_index`: lowercase email → record id
//! - `wallet_index`: lowercase wallet address → record id
//!
//! Uniqueness of display names and credential identifiers is enforced inside
//! a single write transaction. redb serializes writers, so two concurrent
//! registrations with the same identifier commit exactly one record and the
//! other observes the index entry and fails with [`StoreError::Conflict`].

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::users::StoredUser;

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: record id → serialized StoredUser (JSON bytes).
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Index: display name → record id.
const USERNAME_INDEX: TableDefinition<&str, &str> = TableDefinition::new("username_index");

/// Index: lowercase email → record id.
const EMAIL_INDEX: TableDefinition<&str, &str> = TableDefinition::new("email_index");

/// Index: lowercase wallet address → record id.
const WALLET_INDEX: TableDefinition<&str, &str> = TableDefinition::new("wallet_index");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness invariant would be violated. The field names the
    /// conflicting attribute (`username`, `email`, or `wallet address`).
    #[error("{0} already registered")]
    Conflict(&'static str),

    /// An index entry points at a record that does not exist.
    #[error("inconsistent store: {0}")]
    Inconsistent(String),

    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a wallet login: the record plus whether it was just created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletLogin {
    pub user: StoredUser,
    pub created: bool,
}

// =============================================================================
// UserStore
// =============================================================================

/// Authoritative store of identity records.
///
/// The store owns the single durable copy of every record. Lookups are
/// exact-match; emails and wallet addresses are lowercased once on the way in
/// so the case policy is fixed at store creation.
pub struct UserStore {
    db: Database,
}

impl UserStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERNAME_INDEX)?;
            let _ = write_txn.open_table(EMAIL_INDEX)?;
            let _ = write_txn.open_table(WALLET_INDEX)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Check that the backing store answers a read transaction.
    pub fn ping(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(USERS)?;
        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> StoreResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(id)? {
            Some(value) => {
                let user: StoredUser = serde_json::from_slice(value.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Look up a password-scheme record by email (exact match, lowercased).
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredUser>> {
        self.find_by_index(EMAIL_INDEX, &email.to_lowercase())
    }

    /// Look up a wallet-scheme record by address (exact match, lowercased).
    pub fn find_by_wallet(&self, wallet_address: &str) -> StoreResult<Option<StoredUser>> {
        self.find_by_index(WALLET_INDEX, &wallet_address.to_lowercase())
    }

    fn find_by_index(
        &self,
        index: TableDefinition<'static, &'static str, &'static str>,
        key: &str,
    ) -> StoreResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let idx_table = read_txn.open_table(index)?;

        let id = match idx_table.get(key)? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };

        let users_table = read_txn.open_table(USERS)?;
        match users_table.get(id.as_str())? {
            Some(value) => {
                let user: StoredUser = serde_json::from_slice(value.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a password-scheme record.
    ///
    /// Fails with [`StoreError::Conflict`] if the username or email is
    /// already taken. The whole check-and-insert runs in one write
    /// transaction.
    pub fn create_password_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> StoreResult<StoredUser> {
        let user = StoredUser::new_password(username, email, password_hash);
        let email_key = email.to_lowercase();
        let json = serde_json::to_vec(&user)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut username_idx = write_txn.open_table(USERNAME_INDEX)?;
            let mut email_idx = write_txn.open_table(EMAIL_INDEX)?;

            if username_idx.get(username)?.is_some() {
                return Err(StoreError::Conflict("username"));
            }
            if email_idx.get(email_key.as_str())?.is_some() {
                return Err(StoreError::Conflict("email"));
            }

            username_idx.insert(username, user.id())?;
            email_idx.insert(email_key.as_str(), user.id())?;

            let mut users_table = write_txn.open_table(USERS)?;
            users_table.insert(user.id(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(user)
    }

    /// Create a wallet-scheme record, or return the existing one.
    ///
    /// Idempotent by wallet address: repeated calls with the same address
    /// never create a second record. The lookup and the insert share one
    /// write transaction, so two concurrent first logins commit exactly one
    /// record and the loser simply reads it back.
    pub fn create_or_get_wallet_user(
        &self,
        wallet_address: &str,
        username: &str,
    ) -> StoreResult<WalletLogin> {
        let wallet_key = wallet_address.to_lowercase();

        let write_txn = self.db.begin_write()?;
        let outcome = {
            let mut wallet_idx = write_txn.open_table(WALLET_INDEX)?;
            let mut username_idx = write_txn.open_table(USERNAME_INDEX)?;
            let mut users_table = write_txn.open_table(USERS)?;

            let existing_id = wallet_idx
                .get(wallet_key.as_str())?
                .map(|value| value.value().to_string());

            match existing_id {
                Some(id) => {
                    let bytes = users_table
                        .get(id.as_str())?
                        .map(|value| value.value().to_vec())
                        .ok_or_else(|| {
                            StoreError::Inconsistent(format!("wallet index entry {id} has no record"))
                        })?;
                    let user: StoredUser = serde_json::from_slice(&bytes)?;
                    WalletLogin {
                        user,
                        created: false,
                    }
                }
                None => {
                    if username_idx.get(username)?.is_some() {
                        return Err(StoreError::Conflict("username"));
                    }

                    let user = StoredUser::new_wallet(username, &wallet_key);
                    let json = serde_json::to_vec(&user)?;

                    wallet_idx.insert(wallet_key.as_str(), user.id())?;
                    username_idx.insert(username, user.id())?;
                    users_table.insert(user.id(), json.as_slice())?;

                    WalletLogin {
                        user,
                        created: true,
                    }
                }
            }
        };
        write_txn.commit()?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (UserStore, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = UserStore::open(&dir.path().join("users.redb")).expect("Failed to open store");
        (store, dir)
    }

    #[test]
    fn create_and_find_password_user() {
        let (store, _dir) = test_store();

        let user = store
            .create_password_user("alice", "a@x.com", "$argon2id$hash")
            .unwrap();

        let found = store.find_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(found, user);

        let by_id = store.get(user.id()).unwrap().unwrap();
        assert_eq!(by_id, user);
    }

    #[test]
    fn email_lookup_is_case_fixed() {
        let (store, _dir) = test_store();

        store
            .create_password_user("alice", "A@X.com", "$argon2id$hash")
            .unwrap();

        assert!(store.find_by_email("a@x.com").unwrap().is_some());
        assert!(store.find_by_email("A@X.COM").unwrap().is_some());
    }

    #[test]
    fn duplicate_email_is_conflict() {
        let (store, _dir) = test_store();

        store
            .create_password_user("alice", "a@x.com", "$argon2id$hash")
            .unwrap();

        let result = store.create_password_user("alice2", "a@x.com", "$argon2id$other");
        assert!(matches!(result, Err(StoreError::Conflict("email"))));
    }

    #[test]
    fn duplicate_username_is_conflict() {
        let (store, _dir) = test_store();

        store
            .create_password_user("alice", "a@x.com", "$argon2id$hash")
            .unwrap();

        let result = store.create_password_user("alice", "b@x.com", "$argon2id$other");
        assert!(matches!(result, Err(StoreError::Conflict("username"))));

        // The wallet scheme shares the same display-name namespace.
        let result = store.create_or_get_wallet_user("0xABC", "alice");
        assert!(matches!(result, Err(StoreError::Conflict("username"))));
    }

    #[test]
    fn concurrent_registrations_commit_exactly_one() {
        use std::sync::Arc;
        use std::thread;

        let dir = TempDir::new().unwrap();
        let store = Arc::new(UserStore::open(&dir.path().join("users.redb")).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store.create_password_user(&format!("user{i}"), "same@x.com", "$argon2id$hash")
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(StoreError::Conflict("email"))))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(conflicts, results.len() - 1);
    }

    #[test]
    fn failed_create_leaves_no_partial_state() {
        let (store, _dir) = test_store();

        store
            .create_password_user("alice", "a@x.com", "$argon2id$hash")
            .unwrap();

        // Conflicts on email after the username index was consulted; the
        // aborted transaction must not leave "alice2" claimed.
        let _ = store.create_password_user("alice2", "a@x.com", "$argon2id$other");
        assert!(store
            .create_password_user("alice2", "b@x.com", "$argon2id$other")
            .is_ok());
    }

    #[test]
    fn wallet_login_is_idempotent() {
        let (store, _dir) = test_store();

        let first = store.create_or_get_wallet_user("0xABC", "bob").unwrap();
        assert!(first.created);

        let second = store.create_or_get_wallet_user("0xABC", "ignored").unwrap();
        assert!(!second.created);
        assert_eq!(second.user.id(), first.user.id());

        // Case-insensitive by address as well.
        let third = store.create_or_get_wallet_user("0xabc", "ignored").unwrap();
        assert_eq!(third.user.id(), first.user.id());
    }

    #[test]
    fn records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.redb");

        let id = {
            let store = UserStore::open(&path).unwrap();
            store
                .create_password_user("alice", "a@x.com", "$argon2id$hash")
                .unwrap()
                .id()
                .to_string()
        };

        let store = UserStore::open(&path).unwrap();
        let found = store.find_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(found.id(), id);
    }
}
