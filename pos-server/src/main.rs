use pos_server::{
    Config, Server, ServerState, init_logger_with_file, print_banner, setup_environment,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境变量 (.env)
    setup_environment();

    // 2. 加载配置
    let config = Config::from_env()?;

    // 3. 日志 (guard 必须存活到进程结束)
    let logs_dir = config.logs_dir();
    let _log_guard = init_logger_with_file(
        Some(config.log_level.as_str()),
        config.log_json,
        Some(logs_dir.as_path()),
    );

    print_banner();
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        "POS server starting..."
    );

    // 4. 初始化服务器状态 (数据库、菜单、桌台、默认账号)
    let state = ServerState::initialize(&config)?;

    // 5. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
