//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kitchen status of an order
///
/// Only ever moves pending → completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
}

/// One menu item quantity entry
///
/// Name and unit price are captured when the order is placed and never
/// re-read from the menu afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Order entity (点单)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub table_number: u32,
    pub items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Menu selection entry (menu item id + quantity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSelection {
    pub menu_item_id: i64,
    pub quantity: i32,
}

/// Place order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub items: Vec<MenuSelection>,
}

/// Current orders of one table (waiter view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableOrders {
    pub table_number: u32,
    pub contact: Option<String>,
    /// Newest first
    pub orders: Vec<Order>,
    #[serde(with = "rust_decimal::serde::float")]
    pub grand_total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = LineItem {
            menu_item_id: 1,
            name: "Paneer Tikka".to_string(),
            quantity: 2,
            unit_price: Decimal::from(180),
        };
        assert_eq!(item.line_total(), Decimal::new(36000, 2));
    }

    #[test]
    fn test_line_item_price_serializes_as_number() {
        let item = LineItem {
            menu_item_id: 3,
            name: "Masala Chai".to_string(),
            quantity: 1,
            unit_price: Decimal::new(4550, 2),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["unit_price"], serde_json::json!(45.5));

        let back: LineItem = serde_json::from_value(json).unwrap();
        assert_eq!(back.unit_price, Decimal::new(4550, 2));
    }
}
