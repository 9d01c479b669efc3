use std::path::PathBuf;

use shared::models::Role;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TABLE_COUNT | 12 | 首次启动创建的桌台数 |
/// | MENU_PATH | - | 菜单 JSON 文件 (默认内置菜单) |
/// | EVENT_CHANNEL_CAPACITY | 1024 | 事件广播通道容量 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志输出 |
/// | JWT_SECRET | 开发环境随机生成 | 令牌签名密钥 (≥32 字符) |
/// | JWT_EXPIRATION_MINUTES | 720 | 令牌有效期 |
/// | OWNER_PASSWORD / WAITER_PASSWORD / KITCHEN_PASSWORD | 开发环境为角色名 | 初始账号密码 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/pos HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 首次启动时创建的桌台数量 (1..=table_count)
    pub table_count: u32,
    /// 菜单文件路径，None 使用内置菜单
    pub menu_path: Option<PathBuf>,
    /// 事件广播通道容量
    pub event_channel_capacity: usize,
    /// 日志级别
    pub log_level: String,
    /// JSON 日志
    pub log_json: bool,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 初始账号密码 (owner, waiter, kitchen)
    seed_passwords: [Option<String>; 3],
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值。生产环境缺少 `JWT_SECRET` 时失败。
    pub fn from_env() -> Result<Self, ServerError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        let jwt = JwtConfig::from_env(is_production)
            .map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment,
            table_count: std::env::var("TABLE_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(12),
            menu_path: std::env::var("MENU_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            event_channel_capacity: std::env::var("EVENT_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&v: &usize| v > 0)
                .unwrap_or(1024),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            jwt,
            seed_passwords: Role::ALL.map(|role| {
                std::env::var(format!("{}_PASSWORD", role.as_str().to_uppercase())).ok()
            }),
        })
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景：随机 JWT 密钥，不读取环境变量
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port,
            environment: "development".into(),
            table_count: 12,
            menu_path: None,
            event_channel_capacity: 1024,
            log_level: "info".into(),
            log_json: false,
            jwt: JwtConfig::ephemeral(),
            seed_passwords: [None, None, None],
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 数据库文件
    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("pos.redb")
    }

    /// 日志目录
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 角色初始密码
    ///
    /// 非生产环境未配置时使用角色名。
    pub fn seed_password(&self, role: Role) -> Option<String> {
        let idx = Role::ALL.iter().position(|r| *r == role)?;
        self.seed_passwords[idx]
            .clone()
            .or_else(|| (!self.is_production()).then(|| role.as_str().to_string()))
    }

    /// 设置角色初始密码
    pub fn set_seed_password(&mut self, role: Role, password: impl Into<String>) {
        if let Some(idx) = Role::ALL.iter().position(|r| *r == role) {
            self.seed_passwords[idx] = Some(password.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_work_dir() {
        let config = Config::with_overrides("/tmp/pos", 0);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/pos/database/pos.redb")
        );
        assert_eq!(config.logs_dir(), PathBuf::from("/tmp/pos/logs"));
    }

    #[test]
    fn test_seed_password_defaults() {
        let mut config = Config::with_overrides("/tmp/pos", 0);
        assert_eq!(config.seed_password(Role::Waiter).as_deref(), Some("waiter"));

        config.set_seed_password(Role::Owner, "s3cret");
        assert_eq!(config.seed_password(Role::Owner).as_deref(), Some("s3cret"));

        config.environment = "production".into();
        assert!(config.seed_password(Role::Kitchen).is_none());
        assert_eq!(config.seed_password(Role::Owner).as_deref(), Some("s3cret"));
    }
}
