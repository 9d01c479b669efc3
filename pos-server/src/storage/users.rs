use redb::{ReadableTableMetadata, WriteTransaction};
use serde::{Deserialize, Serialize};
use shared::models::{Role, UserInfo};

use super::{PosStorage, StorageResult, USERS_TABLE};

/// Stored staff account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub role: Role,
    pub created_at: i64,
}

impl UserRecord {
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

impl PosStorage {
    // ========== Users ==========

    /// Store a user (insert or overwrite by username)
    pub fn put_user(&self, txn: &WriteTransaction, user: &UserRecord) -> StorageResult<()> {
        let mut users = txn.open_table(USERS_TABLE)?;
        let value = serde_json::to_vec(user)?;
        users.insert(user.username.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get a user by username
    pub fn get_user(&self, username: &str) -> StorageResult<Option<UserRecord>> {
        let read_txn = self.begin_read()?;
        let users = read_txn.open_table(USERS_TABLE)?;

        match users.get(username)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Number of stored users
    pub fn user_count(&self) -> StorageResult<u64> {
        let read_txn = self.begin_read()?;
        let users = read_txn.open_table(USERS_TABLE)?;
        Ok(users.len()?)
    }
}
