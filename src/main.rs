use larder_server::{Config, Server, ServerState, init_logger, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载 .env (忽略不存在)
    let _ = dotenv::dotenv();

    init_logger();
    print_banner();
    tracing::info!("Larder Server starting...");

    let config = Config::from_env();

    let state = ServerState::initialize(config.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Initialization failed: {e}"))?;

    // Server::run 会启动后台任务并在退出时回收
    Server::with_state(config, state)
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

    Ok(())
}
