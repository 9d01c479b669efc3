use redb::{ReadableTable, WriteTransaction};
use shared::models::Order;

use super::{ORDERS_BY_TABLE, ORDERS_TABLE, PosStorage, StorageResult, decode_lenient};

impl PosStorage {
    // ========== Orders ==========

    /// Store an order and index it under its table
    pub fn put_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let value = serde_json::to_vec(order)?;
        {
            let mut orders = txn.open_table(ORDERS_TABLE)?;
            orders.insert(order.id, value.as_slice())?;
        }
        let mut index = txn.open_table(ORDERS_BY_TABLE)?;
        index.insert((order.table_number, order.id), ())?;
        Ok(())
    }

    /// Get an order by ID
    pub fn get_order(&self, order_id: i64) -> StorageResult<Option<Order>> {
        let read_txn = self.begin_read()?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;

        match orders.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order by ID (within transaction)
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: i64,
    ) -> StorageResult<Option<Order>> {
        let orders = txn.open_table(ORDERS_TABLE)?;

        match orders.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All open orders
    pub fn list_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.begin_read()?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;

        let mut result = Vec::new();
        for entry in orders.iter()? {
            let (key, value) = entry?;
            if let Some(order) = decode_lenient("order", key.value(), value.value()) {
                result.push(order);
            }
        }

        Ok(result)
    }

    /// Orders of one table
    pub fn orders_for_table(&self, table_number: u32) -> StorageResult<Vec<Order>> {
        let read_txn = self.begin_read()?;
        let index = read_txn.open_table(ORDERS_BY_TABLE)?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;

        let mut result = Vec::new();
        for entry in index.range((table_number, i64::MIN)..=(table_number, i64::MAX))? {
            let (key, _) = entry?;
            let (_, order_id) = key.value();
            if let Some(value) = orders.get(order_id)?
                && let Some(order) = decode_lenient("order", order_id, value.value())
            {
                result.push(order);
            }
        }

        Ok(result)
    }

    /// Orders of one table (within transaction)
    ///
    /// Unlike the list read, a value that fails to decode is an error: the
    /// caller aggregates these orders before deleting every indexed entry,
    /// so a skipped order would be dropped without being billed.
    pub fn orders_for_table_txn(
        &self,
        txn: &WriteTransaction,
        table_number: u32,
    ) -> StorageResult<Vec<Order>> {
        let index = txn.open_table(ORDERS_BY_TABLE)?;
        let orders = txn.open_table(ORDERS_TABLE)?;

        let mut result = Vec::new();
        for entry in index.range((table_number, i64::MIN)..=(table_number, i64::MAX))? {
            let (key, _) = entry?;
            let (_, order_id) = key.value();
            if let Some(value) = orders.get(order_id)? {
                result.push(serde_json::from_slice(value.value())?);
            }
        }

        Ok(result)
    }

    /// Write raw bytes as an indexed order (damaged-record tests)
    #[cfg(test)]
    pub(crate) fn put_order_bytes(
        &self,
        txn: &WriteTransaction,
        table_number: u32,
        order_id: i64,
        bytes: &[u8],
    ) -> StorageResult<()> {
        let mut orders = txn.open_table(ORDERS_TABLE)?;
        orders.insert(order_id, bytes)?;
        let mut index = txn.open_table(ORDERS_BY_TABLE)?;
        index.insert((table_number, order_id), ())?;
        Ok(())
    }

    /// Delete every order of a table, returns the number of deleted orders
    ///
    /// Entries that failed to decode are deleted too.
    pub fn delete_orders_for_table(
        &self,
        txn: &WriteTransaction,
        table_number: u32,
    ) -> StorageResult<usize> {
        let mut index = txn.open_table(ORDERS_BY_TABLE)?;
        let mut orders = txn.open_table(ORDERS_TABLE)?;

        let mut order_ids = Vec::new();
        for entry in index.range((table_number, i64::MIN)..=(table_number, i64::MAX))? {
            let (key, _) = entry?;
            order_ids.push(key.value().1);
        }

        for order_id in &order_ids {
            orders.remove(*order_id)?;
            index.remove((table_number, *order_id))?;
        }

        Ok(order_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::{LineItem, OrderStatus};

    fn create_test_order(id: i64, table_number: u32) -> Order {
        let items = vec![LineItem {
            menu_item_id: 1,
            name: "Paneer Tikka".to_string(),
            quantity: 2,
            unit_price: Decimal::from(180),
        }];
        Order {
            id,
            table_number,
            total: Decimal::from(360),
            items,
            status: OrderStatus::Pending,
            created_at: id,
            updated_at: id,
        }
    }

    #[test]
    fn test_order_storage_and_table_index() {
        let storage = PosStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.put_order(&txn, &create_test_order(1, 4)).unwrap();
        storage.put_order(&txn, &create_test_order(2, 4)).unwrap();
        storage.put_order(&txn, &create_test_order(3, 5)).unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.get_order(2).unwrap().unwrap().table_number, 4);
        assert_eq!(storage.orders_for_table(4).unwrap().len(), 2);
        assert_eq!(storage.orders_for_table(5).unwrap().len(), 1);
        assert!(storage.orders_for_table(6).unwrap().is_empty());
        assert_eq!(storage.list_orders().unwrap().len(), 3);
    }

    #[test]
    fn test_put_order_overwrites_status() {
        let storage = PosStorage::open_in_memory().unwrap();
        let mut order = create_test_order(1, 4);

        let txn = storage.begin_write().unwrap();
        storage.put_order(&txn, &order).unwrap();
        txn.commit().unwrap();

        order.status = OrderStatus::Completed;
        let txn = storage.begin_write().unwrap();
        storage.put_order(&txn, &order).unwrap();
        txn.commit().unwrap();

        let loaded = storage.get_order(1).unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Completed);
        assert_eq!(storage.orders_for_table(4).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_orders_for_table() {
        let storage = PosStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.put_order(&txn, &create_test_order(1, 4)).unwrap();
        storage.put_order(&txn, &create_test_order(2, 4)).unwrap();
        storage.put_order(&txn, &create_test_order(3, 5)).unwrap();
        txn.commit().unwrap();

        let txn = storage.begin_write().unwrap();
        let deleted = storage.delete_orders_for_table(&txn, 4).unwrap();
        txn.commit().unwrap();

        assert_eq!(deleted, 2);
        assert!(storage.orders_for_table(4).unwrap().is_empty());
        assert!(storage.get_order(1).unwrap().is_none());
        assert_eq!(storage.orders_for_table(5).unwrap().len(), 1);
    }

    #[test]
    fn test_orders_for_table_skips_malformed_values() {
        let storage = PosStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.put_order(&txn, &create_test_order(1, 4)).unwrap();
        {
            let mut orders = txn.open_table(ORDERS_TABLE).unwrap();
            orders.insert(2i64, br#"{"items":"1,2,3"}"#.as_slice()).unwrap();
            let mut index = txn.open_table(ORDERS_BY_TABLE).unwrap();
            index.insert((4u32, 2i64), ()).unwrap();
        }
        txn.commit().unwrap();

        let orders = storage.orders_for_table(4).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, 1);

        // Malformed entries are still removed with the table's orders
        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.delete_orders_for_table(&txn, 4).unwrap(), 2);
        txn.commit().unwrap();
    }

    #[test]
    fn test_orders_for_table_txn_rejects_malformed_values() {
        let storage = PosStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.put_order(&txn, &create_test_order(1, 4)).unwrap();
        {
            let mut orders = txn.open_table(ORDERS_TABLE).unwrap();
            orders.insert(2i64, br#"{"items":"1,2,3"}"#.as_slice()).unwrap();
            let mut index = txn.open_table(ORDERS_BY_TABLE).unwrap();
            index.insert((4u32, 2i64), ()).unwrap();
        }
        txn.commit().unwrap();

        let txn = storage.begin_write().unwrap();
        let result = storage.orders_for_table_txn(&txn, 4);
        assert!(matches!(
            result,
            Err(crate::storage::StorageError::Serialization(_))
        ));
        txn.abort().unwrap();

        // Other tables are unaffected
        let txn = storage.begin_write().unwrap();
        assert!(storage.orders_for_table_txn(&txn, 5).unwrap().is_empty());
        txn.abort().unwrap();
    }
}
