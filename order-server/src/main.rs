use order_server::utils::logger;
use order_server::{Config, Server, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载 .env 和配置
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. 日志 (工作目录先建好，日志可以落盘)
    config.ensure_work_dir_structure()?;
    let log_level = std::env::var("LOG_LEVEL").ok();
    logger::init_logger_with_file(log_level.as_deref(), config.logs_dir().to_str());

    tracing::info!("Order server starting...");

    // 3. 初始化服务器状态 (数据库、迁移、种子数据)
    let state = ServerState::initialize(&config).await;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        anyhow::bail!("server exited with error: {e}");
    }

    Ok(())
}
