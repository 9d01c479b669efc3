//! 订单生命周期集成测试
//!
//! 使用磁盘上的 redb 文件，通过 ServerState 完整初始化。

use pos_server::message::{LifecycleAction, LifecycleEvent, Resource};
use pos_server::{Config, PosStorage, ServerState};
use rust_decimal::Decimal;
use shared::models::{BillStatus, MenuSelection, OrderStatus, TableStatus};

fn state_in(dir: &tempfile::TempDir) -> ServerState {
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    ServerState::initialize(&config).unwrap()
}

fn select(pairs: &[(i64, i32)]) -> Vec<MenuSelection> {
    pairs
        .iter()
        .map(|&(menu_item_id, quantity)| MenuSelection {
            menu_item_id,
            quantity,
        })
        .collect()
}

#[test]
fn test_full_table_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(&dir);
    let lc = &state.lifecycle;

    let table = lc.tables.occupy(4, "9998887776").unwrap();
    assert_eq!(table.status, TableStatus::Occupied);

    let items = lc.intake.items_from_catalog(&select(&[(1, 2)])).unwrap();
    let order = lc.intake.place_order(4, items).unwrap();
    assert_eq!(order.total, Decimal::from(360));

    lc.kitchen.mark_completed(order.id).unwrap();
    let completed = lc.kitchen.list_by_status(OrderStatus::Completed).unwrap();
    let pending = lc.kitchen.list_by_status(OrderStatus::Pending).unwrap();
    assert!(completed.iter().any(|o| o.id == order.id));
    assert!(pending.iter().all(|o| o.id != order.id));

    let bill = lc.billing.send_to_billing(4).unwrap();
    assert_eq!(bill.table_number, 4);
    assert_eq!(bill.total, Decimal::from(360));
    assert_eq!(bill.status, BillStatus::Pending);
    assert_eq!(bill.contact.as_deref(), Some("9998887776"));

    let table = lc.tables.get_by_number(4).unwrap();
    assert_eq!(table.status, TableStatus::Available);
    assert!(table.contact.is_none());
    assert!(lc.intake.orders_for_table(4).unwrap().orders.is_empty());
}

#[test]
fn test_clear_twice_keeps_single_bill() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(&dir);
    let lc = &state.lifecycle;

    lc.tables.occupy(2, "5551234").unwrap();
    let items = lc.intake.items_from_catalog(&select(&[(5, 1)])).unwrap();
    lc.intake.place_order(2, items).unwrap();
    let bill = lc.billing.send_to_billing(2).unwrap();

    let first = lc.billing.mark_cleared(bill.id).unwrap();
    let second = lc.billing.mark_cleared(bill.id).unwrap();
    assert_eq!(first.cleared_at, second.cleared_at);

    let cleared = lc.billing.list_by_status(BillStatus::Cleared).unwrap();
    assert_eq!(cleared.iter().filter(|b| b.id == bill.id).count(), 1);
    assert!(lc.billing.list_by_status(BillStatus::Pending).unwrap().is_empty());
}

#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let (order_id, bill_id) = {
        let state = state_in(&dir);
        let lc = &state.lifecycle;
        lc.tables.occupy(1, "111").unwrap();
        let items = lc.intake.items_from_catalog(&select(&[(9, 1)])).unwrap();
        let billed = lc.intake.place_order(1, items).unwrap();
        let bill = lc.billing.send_to_billing(1).unwrap();

        lc.tables.occupy(3, "333").unwrap();
        let items = lc.intake.items_from_catalog(&select(&[(12, 4)])).unwrap();
        let open = lc.intake.place_order(3, items).unwrap();
        assert_ne!(billed.id, open.id);
        (open.id, bill.id)
    };

    // 重新打开同一个数据库文件
    let state = state_in(&dir);
    let lc = &state.lifecycle;

    // ensure_tables must not reset existing occupancy
    let table = lc.tables.get_by_number(3).unwrap();
    assert_eq!(table.contact.as_deref(), Some("333"));
    let orders = lc.intake.orders_for_table(3).unwrap();
    assert_eq!(orders.orders.len(), 1);
    assert_eq!(orders.orders[0].id, order_id);
    assert_eq!(orders.grand_total, Decimal::from(180));

    let bill = lc.billing.get_bill(bill_id).unwrap();
    assert_eq!(bill.total, Decimal::from(320));
    assert_eq!(lc.tables.list_tables().unwrap().len(), 12);
}

#[test]
fn test_failed_placement_leaves_no_trace() {
    let state = ServerState::initialize_with_storage(
        &Config::with_overrides("/tmp/unused", 0),
        PosStorage::open_in_memory().unwrap(),
    )
    .unwrap();
    let lc = &state.lifecycle;

    // 未开台
    let items = lc.intake.items_from_catalog(&select(&[(1, 1)])).unwrap();
    assert!(lc.intake.place_order(6, items).is_err());
    assert!(lc.kitchen.list_by_status(OrderStatus::Pending).unwrap().is_empty());

    // Unknown menu item rejects the whole selection
    assert!(lc.intake.items_from_catalog(&select(&[(1, 1), (999, 1)])).is_err());

    // Nothing to bill
    lc.tables.occupy(6, "666").unwrap();
    assert!(lc.billing.send_to_billing(6).is_err());
    let table = lc.tables.get_by_number(6).unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
    assert!(lc.billing.list_by_status(BillStatus::Pending).unwrap().is_empty());
}

#[tokio::test]
async fn test_views_are_notified_after_commit() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(&dir);
    let mut rx = state.message_bus.subscribe();
    let lc = &state.lifecycle;

    lc.tables.occupy(7, "777").unwrap();
    let items = lc.intake.items_from_catalog(&select(&[(15, 2)])).unwrap();
    let order = lc.intake.place_order(7, items).unwrap();
    lc.kitchen.mark_completed(order.id).unwrap();
    let bill = lc.billing.send_to_billing(7).unwrap();
    lc.billing.mark_cleared(bill.id).unwrap();

    let mut seen = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        let event: LifecycleEvent = msg.parse_payload().unwrap();
        assert_eq!(event.table_number, 7);
        seen.push((event.resource, event.action));
    }

    assert_eq!(
        seen,
        vec![
            (Resource::Table, LifecycleAction::Occupied),
            (Resource::Order, LifecycleAction::Placed),
            (Resource::Order, LifecycleAction::Completed),
            (Resource::Bill, LifecycleAction::Billed),
            (Resource::Table, LifecycleAction::Released),
            (Resource::Bill, LifecycleAction::Cleared),
        ]
    );
}
