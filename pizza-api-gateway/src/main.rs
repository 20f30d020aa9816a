use clap::Parser;
use dotenvy::dotenv;
use pizza_restaurant_service::{RestaurantService, establish_pool, run_migrations};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod handlers;
mod models;

use config::Config;
use handlers::build_app;

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let pool = establish_pool(&config.database)?;
    let applied = tokio::task::spawn_blocking({
        let pool = pool.clone();
        move || run_migrations(&pool)
    })
    .await??;
    info!(applied, database_url = %config.database.database_url, "database ready");

    let app = build_app(RestaurantService::new(pool));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Pizza API listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    serve(Config::parse()).await
}
