//! Bill Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::{LineItem, Order, OrderStatus};

/// Billing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    #[default]
    Pending,
    Cleared,
}

/// Immutable copy of an order folded into a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub order_id: i64,
    pub items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: i64,
}

impl From<&Order> for OrderSnapshot {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            items: order.items.clone(),
            total: order.total,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

/// Bill entity (账单)
///
/// Never deleted. The only mutation is pending → cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    pub table_number: u32,
    pub contact: Option<String>,
    pub orders: Vec<OrderSnapshot>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: BillStatus,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleared_at: Option<i64>,
}

impl Bill {
    pub fn is_cleared(&self) -> bool {
        self.status == BillStatus::Cleared
    }
}
