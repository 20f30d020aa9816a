use std::net::SocketAddr;

use clap::Parser;
use pizza_restaurant_service::DatabaseConfig;

/// Everything the gateway needs to start, read from flags or the environment.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "HTTP API for restaurants, pizzas and their prices")]
pub struct Config {
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5555")]
    pub bind_addr: SocketAddr,
}
