use std::sync::Arc;

use crate::auth::{JwtService, users};
use crate::core::{Config, Result};
use crate::lifecycle::Lifecycle;
use crate::menu::MenuCatalog;
use crate::message::{MessageBus, TransportConfig};
use crate::storage::PosStorage;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc / 内部共享句柄实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | storage | PosStorage | redb 存储 |
/// | message_bus | MessageBus | 生命周期事件广播 |
/// | catalog | Arc<MenuCatalog> | 菜单目录 |
/// | lifecycle | Lifecycle | 桌台、下单、厨房、账单服务 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (redb)
    pub storage: PosStorage,
    /// 消息总线
    pub message_bus: MessageBus,
    /// 菜单目录
    pub catalog: Arc<MenuCatalog>,
    /// 订单生命周期服务
    pub lifecycle: Lifecycle,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 从已打开的存储构建状态 (不做任何初始化写入)
    pub fn new(config: Config, storage: PosStorage, catalog: MenuCatalog) -> Self {
        let message_bus = MessageBus::from_config(TransportConfig {
            channel_capacity: config.event_channel_capacity,
        });
        let catalog = Arc::new(catalog);
        let lifecycle = Lifecycle::new(storage.clone(), message_bus.clone(), catalog.clone());
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            storage,
            message_bus,
            catalog,
            lifecycle,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据库 (work_dir/database/pos.redb)
    /// 2. 菜单
    /// 3. 各服务
    /// 4. 首次启动数据 (桌台、账号)
    pub fn initialize(config: &Config) -> Result<Self> {
        let db_path = config.database_path();
        let storage = PosStorage::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Database opened");

        Self::initialize_with_storage(config, storage)
    }

    /// 使用给定存储初始化 (测试使用内存数据库)
    pub fn initialize_with_storage(config: &Config, storage: PosStorage) -> Result<Self> {
        let catalog = MenuCatalog::load(config.menu_path.as_deref())?;
        let state = Self::new(config.clone(), storage, catalog);

        state
            .lifecycle
            .tables
            .ensure_tables(config.table_count)
            .map_err(crate::AppError::from)?;
        users::seed_users(&state.storage, |role| config.seed_password(role))?;

        Ok(state)
    }

    /// 关闭 (停止事件流)
    pub fn shutdown(&self) {
        self.message_bus.shutdown();
    }
}
