//! Table Registry: occupancy and the guest contact of each table

use shared::message::{LifecycleAction, Resource};
use shared::models::DiningTable;
use shared::util::{now_millis, snowflake_id};

use super::error::{LifecycleError, LifecycleResult};
use crate::message::MessageBus;
use crate::storage::{PosStorage, StorageError};
use crate::utils::validation::MAX_CONTACT_LEN;

#[derive(Debug, Clone)]
pub struct TableRegistry {
    storage: PosStorage,
    bus: MessageBus,
}

impl TableRegistry {
    pub fn new(storage: PosStorage, bus: MessageBus) -> Self {
        Self { storage, bus }
    }

    /// All tables, ordered by table number
    pub fn list_tables(&self) -> LifecycleResult<Vec<DiningTable>> {
        Ok(self.storage.list_tables()?)
    }

    pub fn get_by_number(&self, table_number: u32) -> LifecycleResult<DiningTable> {
        self.storage
            .get_table(table_number)?
            .ok_or(LifecycleError::TableNotFound(table_number))
    }

    /// Seat a guest at a table
    ///
    /// Occupying a table again with the same contact is a no-op. A table
    /// held by another contact is rejected with `TableOccupied`.
    pub fn occupy(&self, table_number: u32, contact: &str) -> LifecycleResult<DiningTable> {
        let contact = contact.trim();
        if contact.is_empty() {
            return Err(LifecycleError::ContactRequired);
        }
        if contact.len() > MAX_CONTACT_LEN {
            return Err(LifecycleError::Validation(format!(
                "contact is too long ({} chars, max {MAX_CONTACT_LEN})",
                contact.len()
            )));
        }

        let txn = self.storage.begin_write()?;
        let mut table = self
            .storage
            .get_table_txn(&txn, table_number)?
            .ok_or(LifecycleError::TableNotFound(table_number))?;

        if table.is_occupied() {
            txn.abort().map_err(StorageError::from)?;
            if table.contact.as_deref() == Some(contact) {
                return Ok(table);
            }
            tracing::info!(table_number, "Occupy rejected, table held by another guest");
            return Err(LifecycleError::TableOccupied(table_number));
        }

        table.occupy(contact.to_string(), now_millis());
        self.storage.put_table(&txn, &table)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(table_number, "Table occupied");
        self.bus
            .notify(Resource::Table, LifecycleAction::Occupied, table_number, table.id);
        Ok(table)
    }

    /// Free a table and discard its open orders
    ///
    /// Status, contact and the order deletion commit together.
    pub fn release(&self, table_number: u32) -> LifecycleResult<DiningTable> {
        let txn = self.storage.begin_write()?;
        let mut table = self
            .storage
            .get_table_txn(&txn, table_number)?
            .ok_or(LifecycleError::TableNotFound(table_number))?;

        table.release(now_millis());
        self.storage.put_table(&txn, &table)?;
        let discarded = self.storage.delete_orders_for_table(&txn, table_number)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(table_number, discarded, "Table released");
        self.bus
            .notify(Resource::Table, LifecycleAction::Released, table_number, table.id);
        Ok(table)
    }

    /// Create tables `1..=count` that do not exist yet
    ///
    /// Returns the number of tables created.
    pub fn ensure_tables(&self, count: u32) -> LifecycleResult<usize> {
        let txn = self.storage.begin_write()?;
        let now = now_millis();
        let mut created = 0;

        for table_number in 1..=count {
            if self.storage.get_table_txn(&txn, table_number)?.is_none() {
                let table = DiningTable::new(snowflake_id(), table_number, now);
                self.storage.put_table(&txn, &table)?;
                created += 1;
            }
        }

        txn.commit().map_err(StorageError::from)?;
        if created > 0 {
            tracing::info!(created, total = count, "Seeded dining tables");
        }
        Ok(created)
    }
}
