//! POS Server - 餐厅点单生命周期服务
//!
//! # 架构概述
//!
//! - **桌台** (`lifecycle::tables`): 开台 / 清台
//! - **点单** (`lifecycle::intake`): 顾客下单到已占用的桌台
//! - **厨房** (`lifecycle::kitchen`): 待制作订单看板
//! - **账单** (`lifecycle::billing`): 送结账、结清
//! - **菜单** (`menu`): 只读菜单目录
//! - **消息总线** (`message`): 提交后的变更通知 (SSE 推送给各视图)
//! - **认证** (`auth`): JWT + Argon2，按角色分配视图
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务器
//! ├── auth/          # JWT 认证、角色权限
//! ├── api/           # HTTP 路由和处理器
//! ├── lifecycle/     # 订单生命周期业务逻辑
//! ├── menu/          # 菜单目录
//! ├── message/       # 消息总线
//! ├── storage/       # redb 存储层
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod lifecycle;
pub mod menu;
pub mod message;
pub mod storage;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use lifecycle::Lifecycle;
pub use menu::MenuCatalog;
pub use message::{BusMessage, EventType, MessageBus};
pub use storage::PosStorage;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 `.env` (不存在时忽略)
pub fn setup_environment() {
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        eprintln!("Failed to load .env: {}", e);
    }
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/   order lifecycle server v{}
    "#,
        env!("CARGO_PKG_VERSION")
    );
}
