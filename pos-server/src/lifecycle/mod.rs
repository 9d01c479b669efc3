//! Order lifecycle workflows
//!
//! ```text
//! TableRegistry::occupy ──▶ OrderIntake::place_order ──▶ KitchenQueue::mark_completed
//!        ▲                                                        │
//!        │                                                        ▼
//!   (table available) ◀── BillingLedger::send_to_billing ──▶ Bill(pending) ──▶ mark_cleared
//! ```
//!
//! Each service owns a [`PosStorage`] handle and a [`MessageBus`]. Every
//! mutation runs in one redb write transaction and is announced on the bus
//! only after it has committed.

pub mod billing;
pub mod error;
pub mod intake;
pub mod kitchen;
pub mod money;
pub mod tables;

pub use billing::BillingLedger;
pub use error::{LifecycleError, LifecycleResult};
pub use intake::OrderIntake;
pub use kitchen::KitchenQueue;
pub use tables::TableRegistry;

use std::sync::Arc;

use crate::menu::MenuCatalog;
use crate::message::MessageBus;
use crate::storage::PosStorage;

/// All lifecycle services over one storage handle
#[derive(Debug, Clone)]
pub struct Lifecycle {
    pub tables: TableRegistry,
    pub intake: OrderIntake,
    pub kitchen: KitchenQueue,
    pub billing: BillingLedger,
}

impl Lifecycle {
    pub fn new(storage: PosStorage, bus: MessageBus, catalog: Arc<MenuCatalog>) -> Self {
        Self {
            tables: TableRegistry::new(storage.clone(), bus.clone()),
            intake: OrderIntake::new(storage.clone(), bus.clone(), catalog),
            kitchen: KitchenQueue::new(storage.clone(), bus.clone()),
            billing: BillingLedger::new(storage, bus),
        }
    }
}

/// 按 (created_at, id) 倒序
fn sort_newest_first<T, K: Ord>(items: &mut [T], key: impl Fn(&T) -> K) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}
