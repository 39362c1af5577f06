// src/main.rs
mod api;
mod config;
mod cutting;
mod estimate;
mod geometry;
mod material;
mod model;
mod planner;
mod printing;
mod types;

use config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("⚠️ Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();
    let api_config = app_config.api.clone();
    let estimator_config = app_config.estimator;

    println!("🚀 Estimation service starting...");
    api::start_api_server(api_config, estimator_config).await;
}
