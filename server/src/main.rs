use tabled_server::{Config, Server, ServerState, init_logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Environment first: .env is optional, real env vars win
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_logger(&config.log_level, config.is_production())?;

    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "Tabled server starting"
    );

    let state = ServerState::initialize(&config).await?;
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
