use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::storage::StorageError;

/// Order lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Contact is required to occupy a table")]
    ContactRequired,

    #[error("Please add items to your order")]
    OrderEmpty,

    #[error("Invalid quantity {quantity} for menu item {menu_item_id}")]
    InvalidQuantity { menu_item_id: i64, quantity: i32 },

    #[error("Invalid price for menu item {0}")]
    InvalidPrice(i64),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i64),

    #[error("Table not found: {0}")]
    TableNotFound(u32),

    #[error("Table {0} is already occupied")]
    TableOccupied(u32),

    #[error("Table {0} is not occupied")]
    TableNotOccupied(u32),

    #[error("Table {0} has no orders to bill")]
    TableHasNoOrders(u32),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Bill not found: {0}")]
    BillNotFound(i64),
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// 将存储错误转换为错误码
fn classify_storage_error(e: &StorageError) -> ErrorCode {
    if matches!(e, StorageError::Serialization(_)) {
        return ErrorCode::DatabaseError;
    }

    // redb 错误通过字符串匹配分类
    let err_str = e.to_string().to_lowercase();

    // 磁盘空间不足
    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
    {
        return ErrorCode::StorageFull;
    }

    // 数据损坏
    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }

    ErrorCode::SystemBusy
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Storage(e) => {
                let code = classify_storage_error(&e);
                tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
                AppError::with_message(code, e.to_string())
            }
            LifecycleError::Validation(msg) => AppError::validation(msg),
            LifecycleError::ContactRequired => {
                AppError::with_message(ErrorCode::ContactRequired, err.to_string())
            }
            LifecycleError::OrderEmpty => {
                AppError::with_message(ErrorCode::OrderEmpty, err.to_string())
            }
            LifecycleError::InvalidQuantity { menu_item_id, .. } => {
                AppError::with_message(ErrorCode::OrderInvalidQuantity, err.to_string())
                    .with_detail("menu_item_id", menu_item_id)
            }
            LifecycleError::InvalidPrice(menu_item_id) => {
                AppError::with_message(ErrorCode::OrderInvalidPrice, err.to_string())
                    .with_detail("menu_item_id", menu_item_id)
            }
            LifecycleError::MenuItemNotFound(id) => {
                AppError::with_message(ErrorCode::MenuItemNotFound, err.to_string())
                    .with_detail("menu_item_id", id)
            }
            LifecycleError::TableNotFound(n) => {
                AppError::with_message(ErrorCode::TableNotFound, err.to_string())
                    .with_detail("table_number", n)
            }
            LifecycleError::TableOccupied(n) => {
                AppError::with_message(ErrorCode::TableOccupied, err.to_string())
                    .with_detail("table_number", n)
            }
            LifecycleError::TableNotOccupied(n) => {
                AppError::with_message(ErrorCode::TableNotOccupied, err.to_string())
                    .with_detail("table_number", n)
            }
            LifecycleError::TableHasNoOrders(n) => {
                AppError::with_message(ErrorCode::TableHasNoOrders, err.to_string())
                    .with_detail("table_number", n)
            }
            LifecycleError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, err.to_string())
                    .with_detail("order_id", id)
            }
            LifecycleError::BillNotFound(id) => {
                AppError::with_message(ErrorCode::BillNotFound, err.to_string())
                    .with_detail("bill_id", id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_conflicts_map_to_409() {
        let err: AppError = LifecycleError::TableOccupied(4).into();
        assert_eq!(err.code, ErrorCode::TableOccupied);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);

        let err: AppError = LifecycleError::TableHasNoOrders(4).into();
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_order_empty_keeps_user_message() {
        let err: AppError = LifecycleError::OrderEmpty.into();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
        assert_eq!(err.message, "Please add items to your order");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_carries_detail() {
        let err: AppError = LifecycleError::BillNotFound(42).into();
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        let details = err.details.unwrap();
        assert_eq!(details["bill_id"], serde_json::json!(42));
    }
}
