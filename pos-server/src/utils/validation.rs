//! Input validation helpers
//!
//! Text length limits shared by the lifecycle services and the HTTP DTOs.

use validator::ValidationErrors;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Guest contact (phone number or name)
pub const MAX_CONTACT_LEN: usize = 100;

/// Usernames
pub const MAX_USERNAME_LEN: usize = 64;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Menu search query
pub const MAX_QUERY_LEN: usize = 100;

/// Lines per order
pub const MAX_ORDER_LINES: usize = 200;

// `validator` derive takes `u64` length bounds
pub const MAX_CONTACT_LEN_U64: u64 = MAX_CONTACT_LEN as u64;
pub const MAX_USERNAME_LEN_U64: u64 = MAX_USERNAME_LEN as u64;
pub const MAX_PASSWORD_LEN_U64: u64 = MAX_PASSWORD_LEN as u64;
pub const MAX_QUERY_LEN_U64: u64 = MAX_QUERY_LEN as u64;
pub const MAX_ORDER_LINES_U64: u64 = MAX_ORDER_LINES as u64;

/// Convert `validator` errors into a `ValidationFailed` app error
///
/// The first failing field is named in the message; every field is listed
/// in the details.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
    fields.sort_unstable();

    let message = match fields.first() {
        Some(field) => format!("Invalid value for field '{field}'"),
        None => "Validation failed".to_string(),
    };

    AppError::validation(message).with_detail("fields", fields)
}

/// Validate a DTO with `validator`, mapping failures to `AppError`
pub fn validate<T: validator::Validate>(value: &T) -> Result<(), AppError> {
    value.validate().map_err(validation_error)
}
