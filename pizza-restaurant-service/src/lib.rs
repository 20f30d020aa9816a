pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod schema;
pub mod service;

pub use config::DatabaseConfig;
pub use db::{establish_pool, run_migrations, DbPool};
pub use error::RestaurantError;
pub use service::RestaurantService;
