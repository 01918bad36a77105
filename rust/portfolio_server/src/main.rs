// src/main.rs

use portfolio_server::config::ServerConfig;
use portfolio_server::{run_server, StartupError};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    run_server(config).await
}
