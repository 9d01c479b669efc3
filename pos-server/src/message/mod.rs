//! 消息总线模块
//!
//! 进程内广播，提交后的生命周期变更通过这里通知各个视图。

pub mod bus;

pub use bus::{MessageBus, ResourceVersions, TableSubscription, TransportConfig};
pub use shared::message::{
    BusMessage, EventType, LifecycleAction, LifecycleEvent, Resource, SyncPayload,
};
