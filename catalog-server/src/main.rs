use catalog_server::utils::logger;
use catalog_server::{Config, Server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    logger::init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!(
        "Starting catalog-server (env: {}, db: {})",
        config.environment,
        config.database_url
    );

    Server::new(config).run().await?;
    Ok(())
}
