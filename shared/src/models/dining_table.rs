//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Table occupancy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
}

/// Dining table entity (桌台)
///
/// `contact` is set exactly while the table is occupied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: i64,
    pub table_number: u32,
    pub status: TableStatus,
    /// Guest contact (phone number) for the current occupancy
    pub contact: Option<String>,
    pub updated_at: i64,
}

impl DiningTable {
    /// A fresh, available table
    pub fn new(id: i64, table_number: u32, now: i64) -> Self {
        Self {
            id,
            table_number,
            status: TableStatus::Available,
            contact: None,
            updated_at: now,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.status == TableStatus::Occupied
    }

    /// Contact is present iff the table is occupied
    pub fn is_consistent(&self) -> bool {
        self.contact.is_some() == self.is_occupied()
    }

    pub fn occupy(&mut self, contact: String, now: i64) {
        self.status = TableStatus::Occupied;
        self.contact = Some(contact);
        self.updated_at = now;
    }

    pub fn release(&mut self, now: i64) {
        self.status = TableStatus::Available;
        self.contact = None;
        self.updated_at = now;
    }
}

/// Occupy table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupyTable {
    pub contact: String,
}
