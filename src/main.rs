use std::env;
use std::sync::Arc;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::notification::LogNotifier;
use payroll_engine::policy::StaticPolicy;
use payroll_engine::store::InMemoryPayrollStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_line_number(true)
        .init();

    let config_dir = env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.into());
    let bind_addr = env::var("PAYROLL_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());

    let config = ConfigLoader::load(&config_dir)?;
    let state = AppState::from_config(
        config,
        Arc::new(InMemoryPayrollStore::new()),
        Arc::new(StaticPolicy::allow_all()),
        Arc::new(LogNotifier),
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(config_dir = %config_dir, bind_addr = %bind_addr, "Payroll engine listening");
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
