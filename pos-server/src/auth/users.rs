//! Staff accounts: first-start seeding and credential checks

use shared::models::Role;
use shared::util::{now_millis, snowflake_id};

use super::password;
use crate::AppError;
use crate::storage::{PosStorage, StorageError, UserRecord};

/// Create one account per role when no user exists yet
///
/// Usernames equal the role name. `password_for` returns the seed
/// password of a role; `None` aborts seeding with an error.
pub fn seed_users(
    storage: &PosStorage,
    password_for: impl Fn(Role) -> Option<String>,
) -> Result<usize, AppError> {
    if storage.user_count().map_err(storage_error)? > 0 {
        return Ok(0);
    }

    let mut records = Vec::with_capacity(Role::ALL.len());
    for role in Role::ALL {
        let password = password_for(role).ok_or_else(|| {
            AppError::with_message(
                shared::error::ErrorCode::ConfigError,
                format!("No seed password configured for role '{role}'"),
            )
        })?;
        let password_hash = password::hash_password(&password)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
        records.push(UserRecord {
            id: snowflake_id(),
            username: role.as_str().to_string(),
            password_hash,
            role,
            created_at: now_millis(),
        });
    }

    let txn = storage.begin_write().map_err(storage_error)?;
    for record in &records {
        storage.put_user(&txn, record).map_err(storage_error)?;
    }
    txn.commit()
        .map_err(|e| storage_error(StorageError::from(e)))?;

    tracing::info!(count = records.len(), "Seeded staff accounts");
    Ok(records.len())
}

/// Check a username/password pair
///
/// Unknown users and wrong passwords produce the same error.
pub fn authenticate(
    storage: &PosStorage,
    username: &str,
    password: &str,
) -> Result<UserRecord, AppError> {
    let Some(user) = storage.get_user(username).map_err(storage_error)? else {
        tracing::warn!(username = %username, "Login failed - user not found");
        return Err(AppError::invalid_credentials());
    };

    let valid = password::verify_password(password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !valid {
        tracing::warn!(username = %username, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    Ok(user)
}

fn storage_error(e: StorageError) -> AppError {
    AppError::database(e.to_string())
}
