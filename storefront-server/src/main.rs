use storefront_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 设置环境 (dotenv, 日志)
    setup_environment();

    tracing::info!("Storefront server starting...");

    // 2. 加载配置
    let config = Config::from_env()?;
    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        database = %config.database_url,
        "Configuration loaded"
    );
    if config.is_development() {
        tracing::warn!("Development mode: unset secrets fall back to insecure defaults");
    }

    // 3. 初始化服务器状态 (数据库 + 迁移 + 订单引擎)
    let state = ServerState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器, Ctrl-C 优雅退出后关闭连接池
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
