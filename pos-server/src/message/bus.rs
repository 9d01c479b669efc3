//! 消息总线核心实现
//!
//! # 架构
//!
//! ```text
//! TableRegistry / OrderIntake / KitchenQueue / BillingLedger
//!                     │  (after commit)
//!                     ▼
//!        MessageBus::notify() ──▶ broadcast::Sender<BusMessage>
//!                                          │
//!              ┌───────────────────────────┼──────────────────────┐
//!              ▼                           ▼                      ▼
//!       subscribe()              subscribe_table(n)         /api/events (SSE)
//! ```
//!
//! 通知只表示 "需要刷新"，不保证跨事件的顺序。

use dashmap::DashMap;
use shared::message::{BusMessage, LifecycleAction, LifecycleEvent, Resource};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::utils::AppError;

/// Configuration for the bus
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Capacity of the broadcast channel (default: 1024)
    pub channel_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

/// 资源版本管理器
///
/// 每种资源类型维护独立的版本号，支持原子递增。
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<Resource, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 递增指定资源的版本号并返回新值 (从 1 开始)
    pub fn increment(&self, resource: Resource) -> u64 {
        let mut entry = self.versions.entry(resource).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取指定资源的当前版本号 (不存在时为 0)
    pub fn get(&self, resource: Resource) -> u64 {
        self.versions.get(&resource).map(|v| *v).unwrap_or(0)
    }
}

/// 消息总线 - 负责生命周期变更通知的广播
#[derive(Debug, Clone)]
pub struct MessageBus {
    /// 服务器到订阅者的广播通道
    tx: broadcast::Sender<BusMessage>,
    /// 配置
    config: TransportConfig,
    /// 资源版本号
    versions: Arc<ResourceVersions>,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
}

impl MessageBus {
    /// 创建默认配置的消息总线
    pub fn new() -> Self {
        Self::from_config(TransportConfig::default())
    }

    /// 从配置创建消息总线
    pub fn from_config(config: TransportConfig) -> Self {
        let (tx, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            tx,
            config,
            versions: Arc::new(ResourceVersions::new()),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// 创建指定容量的消息总线
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_config(TransportConfig {
            channel_capacity: capacity,
        })
    }

    /// 发布消息 (服务器 -> 所有订阅者)
    ///
    /// Returns the number of subscribers that received the message.
    /// Having no subscribers is not an error.
    pub fn publish(&self, msg: BusMessage) -> Result<usize, AppError> {
        if self.shutdown_token.is_cancelled() {
            return Err(AppError::internal("Message bus is shut down"));
        }
        Ok(self.tx.send(msg).unwrap_or(0))
    }

    /// 广播生命周期变更
    ///
    /// Called after the mutation has committed. Failures are logged and
    /// swallowed: a lost notification only delays a view refresh.
    pub fn notify(
        &self,
        resource: Resource,
        action: LifecycleAction,
        table_number: u32,
        id: i64,
    ) {
        let event = LifecycleEvent {
            resource,
            action,
            table_number,
            id,
            version: self.versions.increment(resource),
        };

        let result = BusMessage::notification(&event)
            .map_err(|e| AppError::internal(e.to_string()))
            .and_then(|msg| self.publish(msg.with_source("pos-server")));

        match result {
            Ok(receivers) => tracing::debug!(
                resource = %resource,
                action = %action,
                table_number,
                id,
                receivers,
                "Lifecycle event published"
            ),
            Err(e) => tracing::warn!(
                resource = %resource,
                action = %action,
                table_number,
                error = %e,
                "Failed to publish lifecycle event"
            ),
        }
    }

    /// 订阅所有通知
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    /// 订阅指定桌台的通知
    pub fn subscribe_table(&self, table_number: u32) -> TableSubscription {
        TableSubscription {
            table_number,
            rx: self.tx.subscribe(),
        }
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// 资源当前版本号
    pub fn version(&self, resource: Resource) -> u64 {
        self.versions.get(resource)
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// 获取关闭令牌 (用于监控关闭信号)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 关闭消息总线
    pub fn shutdown(&self) {
        tracing::info!("Shutting down message bus");
        self.shutdown_token.cancel();
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscription that only yields events for one table
///
/// Sync signals (missed events) are always passed through because the
/// subscriber cannot know whether the skipped events touched its table.
pub struct TableSubscription {
    table_number: u32,
    rx: broadcast::Receiver<BusMessage>,
}

impl TableSubscription {
    pub fn table_number(&self) -> u32 {
        self.table_number
    }

    /// Wait for the next event of this table
    pub async fn recv(&mut self) -> Result<BusMessage, RecvError> {
        loop {
            let msg = self.rx.recv().await?;
            match msg.table_number() {
                Some(n) if n != self.table_number => continue,
                _ => return Ok(msg),
            }
        }
    }
}
