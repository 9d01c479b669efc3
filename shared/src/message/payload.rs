use serde::{Deserialize, Serialize};
use std::fmt;

/// 变更资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Table,
    Order,
    Bill,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Order => "order",
            Self::Bill => "bill",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 生命周期动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// Table occupied by a guest
    Occupied,
    /// Table released (orders discarded)
    Released,
    /// New order placed
    Placed,
    /// Order completed by the kitchen
    Completed,
    /// Table's orders folded into a bill
    Billed,
    /// Bill cleared
    Cleared,
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Occupied => "occupied",
            Self::Released => "released",
            Self::Placed => "placed",
            Self::Completed => "completed",
            Self::Billed => "billed",
            Self::Cleared => "cleared",
        };
        f.write_str(s)
    }
}

/// 生命周期变更通知 (服务端 -> 订阅者)
///
/// Subscribers treat every event as a refresh signal for the affected
/// view, never as a delta to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub resource: Resource,
    pub action: LifecycleAction,
    /// Table the change belongs to
    pub table_number: u32,
    /// Record id (table, order or bill)
    pub id: i64,
    /// Per-resource version, incremented on every published change
    pub version: u64,
}

/// 同步信号载荷
///
/// Sent to a subscriber that fell behind and missed events; the
/// subscriber refetches everything it displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPayload {
    /// Number of events that were skipped
    pub missed: u64,
}
