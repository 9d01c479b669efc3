use redb::{ReadableTable, WriteTransaction};
use shared::models::Bill;

use super::{BILLS_TABLE, PosStorage, StorageResult, decode_lenient};

impl PosStorage {
    // ========== Bills ==========

    /// Store a bill (insert or overwrite)
    pub fn put_bill(&self, txn: &WriteTransaction, bill: &Bill) -> StorageResult<()> {
        let mut bills = txn.open_table(BILLS_TABLE)?;
        let value = serde_json::to_vec(bill)?;
        bills.insert(bill.id, value.as_slice())?;
        Ok(())
    }

    /// Get a bill by ID
    pub fn get_bill(&self, bill_id: i64) -> StorageResult<Option<Bill>> {
        let read_txn = self.begin_read()?;
        let bills = read_txn.open_table(BILLS_TABLE)?;

        match bills.get(bill_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a bill by ID (within transaction)
    pub fn get_bill_txn(&self, txn: &WriteTransaction, bill_id: i64) -> StorageResult<Option<Bill>> {
        let bills = txn.open_table(BILLS_TABLE)?;

        match bills.get(bill_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All bills
    pub fn list_bills(&self) -> StorageResult<Vec<Bill>> {
        let read_txn = self.begin_read()?;
        let bills = read_txn.open_table(BILLS_TABLE)?;

        let mut result = Vec::new();
        for entry in bills.iter()? {
            let (key, value) = entry?;
            if let Some(bill) = decode_lenient("bill", key.value(), value.value()) {
                result.push(bill);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::BillStatus;

    fn create_test_bill(id: i64) -> Bill {
        Bill {
            id,
            table_number: 4,
            contact: Some("9998887776".to_string()),
            orders: vec![],
            total: Decimal::new(36000, 2),
            status: BillStatus::Pending,
            created_at: id,
            cleared_at: None,
        }
    }

    #[test]
    fn test_bill_storage() {
        let storage = PosStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.put_bill(&txn, &create_test_bill(1)).unwrap();
        storage.put_bill(&txn, &create_test_bill(2)).unwrap();
        txn.commit().unwrap();

        let bill = storage.get_bill(1).unwrap().unwrap();
        assert_eq!(bill.total, Decimal::from(360));
        assert_eq!(bill.contact.as_deref(), Some("9998887776"));
        assert_eq!(storage.list_bills().unwrap().len(), 2);
        assert!(storage.get_bill(3).unwrap().is_none());
    }

    #[test]
    fn test_bill_status_update_in_txn() {
        let storage = PosStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.put_bill(&txn, &create_test_bill(1)).unwrap();
        txn.commit().unwrap();

        let txn = storage.begin_write().unwrap();
        let mut bill = storage.get_bill_txn(&txn, 1).unwrap().unwrap();
        bill.status = BillStatus::Cleared;
        bill.cleared_at = Some(99);
        storage.put_bill(&txn, &bill).unwrap();
        txn.commit().unwrap();

        let bill = storage.get_bill(1).unwrap().unwrap();
        assert!(bill.is_cleared());
        assert_eq!(bill.cleared_at, Some(99));
        assert_eq!(storage.list_bills().unwrap().len(), 1);
    }
}
