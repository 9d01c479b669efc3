//! Billing Ledger
//!
//! `send_to_billing` folds a table's orders into a bill, frees the table
//! and deletes the orders inside one write transaction. Either all of it
//! commits or nothing does.

use shared::message::{LifecycleAction, Resource};
use shared::models::{Bill, BillStatus, OrderSnapshot};
use shared::util::{now_millis, snowflake_id};

use super::error::{LifecycleError, LifecycleResult};
use super::money;
use crate::message::MessageBus;
use crate::storage::{PosStorage, StorageError};

#[derive(Debug, Clone)]
pub struct BillingLedger {
    storage: PosStorage,
    bus: MessageBus,
}

impl BillingLedger {
    pub fn new(storage: PosStorage, bus: MessageBus) -> Self {
        Self { storage, bus }
    }

    /// Close a table's tab into a pending bill
    pub fn send_to_billing(&self, table_number: u32) -> LifecycleResult<Bill> {
        let txn = self.storage.begin_write()?;

        // 1. contact
        let mut table = self
            .storage
            .get_table_txn(&txn, table_number)?
            .ok_or(LifecycleError::TableNotFound(table_number))?;

        // 2. aggregate (any status), oldest first
        let mut orders = self.storage.orders_for_table_txn(&txn, table_number)?;
        if orders.is_empty() {
            return Err(LifecycleError::TableHasNoOrders(table_number));
        }
        orders.sort_by_key(|o| (o.created_at, o.id));

        let now = now_millis();
        let bill = Bill {
            id: snowflake_id(),
            table_number,
            contact: table.contact.clone(),
            total: money::orders_total(&orders),
            orders: orders.iter().map(OrderSnapshot::from).collect(),
            status: BillStatus::Pending,
            created_at: now,
            cleared_at: None,
        };

        // 3. bill, 4. table, 5. orders
        self.storage.put_bill(&txn, &bill)?;
        table.release(now);
        self.storage.put_table(&txn, &table)?;
        self.storage.delete_orders_for_table(&txn, table_number)?;

        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            bill_id = bill.id,
            table_number,
            orders = bill.orders.len(),
            total = %bill.total,
            "Table sent to billing"
        );
        self.bus
            .notify(Resource::Bill, LifecycleAction::Billed, table_number, bill.id);
        self.bus
            .notify(Resource::Table, LifecycleAction::Released, table_number, table.id);
        Ok(bill)
    }

    /// pending → cleared
    ///
    /// Clearing a cleared bill is a no-op and keeps the first `cleared_at`.
    pub fn mark_cleared(&self, bill_id: i64) -> LifecycleResult<Bill> {
        let txn = self.storage.begin_write()?;
        let mut bill = self
            .storage
            .get_bill_txn(&txn, bill_id)?
            .ok_or(LifecycleError::BillNotFound(bill_id))?;

        if bill.is_cleared() {
            txn.abort().map_err(StorageError::from)?;
            return Ok(bill);
        }

        bill.status = BillStatus::Cleared;
        bill.cleared_at = Some(now_millis());
        self.storage.put_bill(&txn, &bill)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(bill_id, table_number = bill.table_number, "Bill cleared");
        self.bus.notify(
            Resource::Bill,
            LifecycleAction::Cleared,
            bill.table_number,
            bill.id,
        );
        Ok(bill)
    }

    /// Bills with the given status, newest first
    pub fn list_by_status(&self, status: BillStatus) -> LifecycleResult<Vec<Bill>> {
        let mut bills: Vec<Bill> = self
            .storage
            .list_bills()?
            .into_iter()
            .filter(|b| b.status == status)
            .collect();
        super::sort_newest_first(&mut bills, |b| (b.created_at, b.id));
        Ok(bills)
    }

    pub fn get_bill(&self, bill_id: i64) -> LifecycleResult<Bill> {
        self.storage
            .get_bill(bill_id)?
            .ok_or(LifecycleError::BillNotFound(bill_id))
    }
}
