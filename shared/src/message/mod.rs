//! 消息总线消息类型定义
//!
//! 这些类型在 pos-server 和订阅视图 (厨房、收银、服务员) 之间共享。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// 消息总线事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// 生命周期变更通知
    Notification = 1,
    /// 同步信号 (订阅者需要全量刷新)
    Sync = 4,
}

impl TryFrom<u8> for EventType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EventType::Notification),
            4 => Ok(EventType::Sync),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Notification => write!(f, "notification"),
            EventType::Sync => write!(f, "sync"),
        }
    }
}

/// 消息总线消息体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    pub event_type: EventType,
    pub source: Option<String>,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(event_type: EventType, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            source: None,
            payload,
        }
    }

    /// 设置消息来源
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// 创建生命周期通知消息
    pub fn notification(event: &LifecycleEvent) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::Notification, serde_json::to_vec(event)?))
    }

    /// 创建同步信号消息
    pub fn sync(payload: &SyncPayload) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::Sync, serde_json::to_vec(payload)?))
    }

    /// 解析载荷为指定类型
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }

    /// Table number of a lifecycle notification, if this is one
    pub fn table_number(&self) -> Option<u32> {
        match self.event_type {
            EventType::Notification => self
                .parse_payload::<LifecycleEvent>()
                .ok()
                .map(|e| e.table_number),
            EventType::Sync => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> LifecycleEvent {
        LifecycleEvent {
            resource: Resource::Order,
            action: LifecycleAction::Placed,
            table_number: 4,
            id: 42,
            version: 1,
        }
    }

    #[test]
    fn test_notification_message() {
        let msg = BusMessage::notification(&sample_event()).unwrap();
        assert_eq!(msg.event_type, EventType::Notification);
        assert!(!msg.request_id.is_nil());

        let parsed: LifecycleEvent = msg.parse_payload().unwrap();
        assert_eq!(parsed, sample_event());
        assert_eq!(msg.table_number(), Some(4));
    }

    #[test]
    fn test_sync_message_has_no_table() {
        let msg = BusMessage::sync(&SyncPayload { missed: 3 })
            .unwrap()
            .with_source("pos-server");
        assert_eq!(msg.event_type, EventType::Sync);
        assert_eq!(msg.source.as_deref(), Some("pos-server"));
        assert_eq!(msg.table_number(), None);
    }

    #[test]
    fn test_event_type_conversion() {
        assert_eq!(EventType::try_from(1), Ok(EventType::Notification));
        assert_eq!(EventType::try_from(4), Ok(EventType::Sync));
        assert!(EventType::try_from(2).is_err());
        assert_eq!(EventType::Sync.to_string(), "sync");
    }

    #[test]
    fn test_lifecycle_event_json_shape() {
        let json = serde_json::to_value(sample_event()).unwrap();
        assert_eq!(json["resource"], "order");
        assert_eq!(json["action"], "placed");
        assert_eq!(json["table_number"], 4);
    }
}
