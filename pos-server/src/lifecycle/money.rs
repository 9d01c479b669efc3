//! Money calculation for orders and bills
//!
//! Totals are computed with `Decimal` and rounded to 2 places (half-up)
//! once, at the point where a total is stored.

use rust_decimal::prelude::*;
use shared::models::{LineItem, Order};

use super::error::{LifecycleError, LifecycleResult};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Maximum allowed unit price
pub(crate) const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate line items before they are stored
///
/// Rejects an empty list, non-positive quantities and negative prices.
pub fn validate_line_items(items: &[LineItem]) -> LifecycleResult<()> {
    if items.is_empty() {
        return Err(LifecycleError::OrderEmpty);
    }

    for item in items {
        if item.quantity <= 0 || item.quantity > MAX_QUANTITY {
            return Err(LifecycleError::InvalidQuantity {
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
            });
        }
        if item.unit_price.is_sign_negative() || item.unit_price > MAX_PRICE {
            return Err(LifecycleError::InvalidPrice(item.menu_item_id));
        }
        if item.name.trim().is_empty() {
            return Err(LifecycleError::Validation(format!(
                "Line item {} has no name",
                item.menu_item_id
            )));
        }
    }

    Ok(())
}

/// Σ(unit_price × quantity)
pub fn order_total(items: &[LineItem]) -> Decimal {
    round_money(items.iter().map(LineItem::line_total).sum())
}

/// Sum of stored order totals
pub fn orders_total<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Decimal {
    round_money(orders.into_iter().map(|o| o.total).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, price: Decimal, quantity: i32) -> LineItem {
        LineItem {
            menu_item_id: id,
            name: format!("Item {id}"),
            quantity,
            unit_price: price,
        }
    }

    #[test]
    fn test_order_total() {
        let items = vec![
            item(1, Decimal::from(180), 2),
            item(2, Decimal::new(4550, 2), 3),
        ];
        assert_eq!(order_total(&items), Decimal::new(49650, 2));
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(Decimal::new(1005, 3)), Decimal::new(101, 2));
        assert_eq!(round_money(Decimal::new(1004, 3)), Decimal::new(100, 2));
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(matches!(
            validate_line_items(&[]),
            Err(LifecycleError::OrderEmpty)
        ));
    }

    #[test]
    fn test_validate_rejects_bad_quantity_and_price() {
        assert!(matches!(
            validate_line_items(&[item(1, Decimal::from(180), 0)]),
            Err(LifecycleError::InvalidQuantity { quantity: 0, .. })
        ));
        assert!(matches!(
            validate_line_items(&[item(1, Decimal::from(180), -2)]),
            Err(LifecycleError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            validate_line_items(&[item(7, Decimal::from(-1), 1)]),
            Err(LifecycleError::InvalidPrice(7))
        ));
    }

    #[test]
    fn test_free_items_are_allowed() {
        assert!(validate_line_items(&[item(1, Decimal::ZERO, 1)]).is_ok());
    }
}
