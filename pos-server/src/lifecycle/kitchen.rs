//! Kitchen Queue: pending orders and their completion

use shared::message::{LifecycleAction, Resource};
use shared::models::{Order, OrderStatus};
use shared::util::now_millis;

use super::error::{LifecycleError, LifecycleResult};
use crate::message::MessageBus;
use crate::storage::{PosStorage, StorageError};

#[derive(Debug, Clone)]
pub struct KitchenQueue {
    storage: PosStorage,
    bus: MessageBus,
}

impl KitchenQueue {
    pub fn new(storage: PosStorage, bus: MessageBus) -> Self {
        Self { storage, bus }
    }

    /// Orders with the given status, newest first
    pub fn list_by_status(&self, status: OrderStatus) -> LifecycleResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .storage
            .list_orders()?
            .into_iter()
            .filter(|o| o.status == status)
            .collect();
        super::sort_newest_first(&mut orders, |o| (o.created_at, o.id));
        Ok(orders)
    }

    /// pending → completed
    ///
    /// Completing an already-completed order returns it unchanged.
    pub fn mark_completed(&self, order_id: i64) -> LifecycleResult<Order> {
        let txn = self.storage.begin_write()?;
        let mut order = self
            .storage
            .get_order_txn(&txn, order_id)?
            .ok_or(LifecycleError::OrderNotFound(order_id))?;

        if order.status == OrderStatus::Completed {
            txn.abort().map_err(StorageError::from)?;
            return Ok(order);
        }

        order.status = OrderStatus::Completed;
        order.updated_at = now_millis();
        self.storage.put_order(&txn, &order)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(order_id, table_number = order.table_number, "Order completed");
        self.bus.notify(
            Resource::Order,
            LifecycleAction::Completed,
            order.table_number,
            order.id,
        );
        Ok(order)
    }
}
