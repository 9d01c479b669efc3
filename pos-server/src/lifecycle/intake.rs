//! Order Intake: waiter submissions against occupied tables

use std::sync::Arc;

use shared::message::{LifecycleAction, Resource};
use shared::models::{LineItem, MenuSelection, Order, OrderStatus, TableOrders};
use shared::util::{now_millis, snowflake_id};

use super::error::{LifecycleError, LifecycleResult};
use super::money;
use crate::menu::MenuCatalog;
use crate::message::MessageBus;
use crate::storage::{PosStorage, StorageError};

#[derive(Debug, Clone)]
pub struct OrderIntake {
    storage: PosStorage,
    bus: MessageBus,
    catalog: Arc<MenuCatalog>,
}

impl OrderIntake {
    pub fn new(storage: PosStorage, bus: MessageBus, catalog: Arc<MenuCatalog>) -> Self {
        Self {
            storage,
            bus,
            catalog,
        }
    }

    /// Capture name and price of each selected menu item
    pub fn items_from_catalog(&self, selection: &[MenuSelection]) -> LifecycleResult<Vec<LineItem>> {
        if selection.is_empty() {
            return Err(LifecycleError::OrderEmpty);
        }

        selection
            .iter()
            .map(|s| {
                if s.quantity <= 0 {
                    return Err(LifecycleError::InvalidQuantity {
                        menu_item_id: s.menu_item_id,
                        quantity: s.quantity,
                    });
                }
                let item = self
                    .catalog
                    .get(s.menu_item_id)
                    .ok_or(LifecycleError::MenuItemNotFound(s.menu_item_id))?;
                Ok(LineItem {
                    menu_item_id: item.id,
                    name: item.name.clone(),
                    quantity: s.quantity,
                    unit_price: item.price,
                })
            })
            .collect()
    }

    /// Record a new pending order for an occupied table
    ///
    /// The total is fixed here from the captured prices. Table status is
    /// left unchanged.
    pub fn place_order(&self, table_number: u32, items: Vec<LineItem>) -> LifecycleResult<Order> {
        money::validate_line_items(&items)?;

        let txn = self.storage.begin_write()?;
        let table = self
            .storage
            .get_table_txn(&txn, table_number)?
            .ok_or(LifecycleError::TableNotFound(table_number))?;
        if !table.is_occupied() {
            return Err(LifecycleError::TableNotOccupied(table_number));
        }

        let now = now_millis();
        let order = Order {
            id: snowflake_id(),
            table_number,
            total: money::order_total(&items),
            items,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.storage.put_order(&txn, &order)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            order_id = order.id,
            table_number,
            items = order.items.len(),
            total = %order.total,
            "Order placed"
        );
        self.bus
            .notify(Resource::Order, LifecycleAction::Placed, table_number, order.id);
        Ok(order)
    }

    /// Current orders of a table, newest first, with their grand total
    pub fn orders_for_table(&self, table_number: u32) -> LifecycleResult<TableOrders> {
        let table = self
            .storage
            .get_table(table_number)?
            .ok_or(LifecycleError::TableNotFound(table_number))?;

        let mut orders = self.storage.orders_for_table(table_number)?;
        super::sort_newest_first(&mut orders, |o| (o.created_at, o.id));

        Ok(TableOrders {
            table_number,
            contact: table.contact,
            grand_total: money::orders_total(&orders),
            orders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::TableRegistry;
    use rust_decimal::Decimal;

    fn setup() -> (TableRegistry, OrderIntake) {
        let storage = PosStorage::open_in_memory().unwrap();
        let bus = MessageBus::new();
        let catalog = Arc::new(MenuCatalog::embedded().unwrap());
        let tables = TableRegistry::new(storage.clone(), bus.clone());
        tables.ensure_tables(6).unwrap();
        (tables, OrderIntake::new(storage, bus, catalog))
    }

    fn select(menu_item_id: i64, quantity: i32) -> MenuSelection {
        MenuSelection {
            menu_item_id,
            quantity,
        }
    }

    #[test]
    fn test_place_order_computes_total() {
        let (tables, intake) = setup();
        tables.occupy(4, "9998887776").unwrap();

        let items = intake.items_from_catalog(&[select(1, 2)]).unwrap();
        assert_eq!(items[0].name, "Paneer Tikka");

        let order = intake.place_order(4, items).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, Decimal::new(36000, 2));

        // table status untouched
        assert!(tables.get_by_number(4).unwrap().is_occupied());
    }

    #[test]
    fn test_place_order_rejects_empty() {
        let (tables, intake) = setup();
        tables.occupy(4, "9998887776").unwrap();

        let err = intake.place_order(4, vec![]).unwrap_err();
        assert!(matches!(err, LifecycleError::OrderEmpty));
        assert_eq!(err.to_string(), "Please add items to your order");
        assert!(intake.orders_for_table(4).unwrap().orders.is_empty());
    }

    #[test]
    fn test_place_order_requires_occupied_table() {
        let (_tables, intake) = setup();
        let items = intake.items_from_catalog(&[select(1, 1)]).unwrap();

        assert!(matches!(
            intake.place_order(2, items.clone()),
            Err(LifecycleError::TableNotOccupied(2))
        ));
        assert!(matches!(
            intake.place_order(42, items),
            Err(LifecycleError::TableNotFound(42))
        ));
    }

    #[test]
    fn test_items_from_catalog_validation() {
        let (_tables, intake) = setup();
        assert!(matches!(
            intake.items_from_catalog(&[]),
            Err(LifecycleError::OrderEmpty)
        ));
        assert!(matches!(
            intake.items_from_catalog(&[select(9999, 1)]),
            Err(LifecycleError::MenuItemNotFound(9999))
        ));
        assert!(matches!(
            intake.items_from_catalog(&[select(1, 0)]),
            Err(LifecycleError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_orders_for_table_newest_first() {
        let (tables, intake) = setup();
        tables.occupy(1, "123").unwrap();

        let first = intake
            .place_order(1, intake.items_from_catalog(&[select(1, 1)]).unwrap())
            .unwrap();
        let second = intake
            .place_order(1, intake.items_from_catalog(&[select(12, 4)]).unwrap())
            .unwrap();

        let view = intake.orders_for_table(1).unwrap();
        assert_eq!(view.contact.as_deref(), Some("123"));
        assert_eq!(view.orders.len(), 2);
        assert_eq!(view.orders[0].id, second.id);
        assert_eq!(view.orders[1].id, first.id);
        assert_eq!(view.grand_total, Decimal::from(180 + 4 * 45));
    }

    #[test]
    fn test_captured_price_is_not_reread() {
        let (tables, intake) = setup();
        tables.occupy(1, "123").unwrap();

        let mut items = intake.items_from_catalog(&[select(1, 1)]).unwrap();
        items[0].unit_price = Decimal::new(15050, 2);
        let order = intake.place_order(1, items).unwrap();
        assert_eq!(order.total, Decimal::new(15050, 2));
        assert_eq!(order.items[0].unit_price, Decimal::new(15050, 2));
    }
}
