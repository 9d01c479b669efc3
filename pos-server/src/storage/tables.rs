use redb::{ReadableTable, ReadableTableMetadata, WriteTransaction};
use shared::models::DiningTable;

use super::{PosStorage, StorageResult, TABLES_TABLE, decode_lenient};

impl PosStorage {
    // ========== Dining Tables ==========

    /// Store a table (insert or overwrite)
    pub fn put_table(&self, txn: &WriteTransaction, table: &DiningTable) -> StorageResult<()> {
        let mut t = txn.open_table(TABLES_TABLE)?;
        let value = serde_json::to_vec(table)?;
        t.insert(table.table_number, value.as_slice())?;
        Ok(())
    }

    /// Get a table by number
    pub fn get_table(&self, table_number: u32) -> StorageResult<Option<DiningTable>> {
        let read_txn = self.begin_read()?;
        let t = read_txn.open_table(TABLES_TABLE)?;

        match t.get(table_number)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a table by number (within transaction)
    pub fn get_table_txn(
        &self,
        txn: &WriteTransaction,
        table_number: u32,
    ) -> StorageResult<Option<DiningTable>> {
        let t = txn.open_table(TABLES_TABLE)?;

        match t.get(table_number)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All tables, ordered by table number
    pub fn list_tables(&self) -> StorageResult<Vec<DiningTable>> {
        let read_txn = self.begin_read()?;
        let t = read_txn.open_table(TABLES_TABLE)?;

        let mut tables = Vec::new();
        for result in t.iter()? {
            let (key, value) = result?;
            if let Some(table) = decode_lenient("table", key.value(), value.value()) {
                tables.push(table);
            }
        }

        Ok(tables)
    }

    /// Number of stored tables
    pub fn table_count(&self) -> StorageResult<u64> {
        let read_txn = self.begin_read()?;
        let t = read_txn.open_table(TABLES_TABLE)?;
        Ok(t.len()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::TableStatus;

    #[test]
    fn test_put_and_get_table() {
        let storage = PosStorage::open_in_memory().unwrap();
        let mut table = DiningTable::new(100, 4, 0);
        table.occupy("9998887776".to_string(), 1);

        let txn = storage.begin_write().unwrap();
        storage.put_table(&txn, &table).unwrap();
        txn.commit().unwrap();

        let loaded = storage.get_table(4).unwrap().unwrap();
        assert_eq!(loaded, table);
        assert_eq!(loaded.status, TableStatus::Occupied);
        assert!(storage.get_table(5).unwrap().is_none());
    }

    #[test]
    fn test_list_tables_sorted_by_number() {
        let storage = PosStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        for n in [12u32, 3, 7, 1] {
            storage
                .put_table(&txn, &DiningTable::new(n as i64, n, 0))
                .unwrap();
        }
        txn.commit().unwrap();

        let numbers: Vec<u32> = storage
            .list_tables()
            .unwrap()
            .iter()
            .map(|t| t.table_number)
            .collect();
        assert_eq!(numbers, vec![1, 3, 7, 12]);
        assert_eq!(storage.table_count().unwrap(), 4);
    }

    #[test]
    fn test_list_tables_skips_malformed_values() {
        let storage = PosStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.put_table(&txn, &DiningTable::new(1, 1, 0)).unwrap();
        {
            let mut t = txn.open_table(TABLES_TABLE).unwrap();
            t.insert(2u32, b"{not json".as_slice()).unwrap();
        }
        storage.put_table(&txn, &DiningTable::new(3, 3, 0)).unwrap();
        txn.commit().unwrap();

        let tables = storage.list_tables().unwrap();
        assert_eq!(tables.len(), 2);
        assert!(storage.get_table(2).is_err());
    }
}
