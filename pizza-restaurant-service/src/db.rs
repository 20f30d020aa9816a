use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, info};

use crate::{DatabaseConfig, RestaurantError};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite ships with foreign keys off; every connection has to opt in
/// before the cascade from restaurants to restaurant_pizzas fires.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn establish_pool(config: &DatabaseConfig) -> Result<DbPool, RestaurantError> {
    let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
    let builder = Pool::builder().connection_customizer(Box::new(SqlitePragmas));

    // An in-memory database disappears with its connection, so keep exactly one
    // and never recycle it.
    let builder = if config.is_in_memory() {
        builder.max_size(1).max_lifetime(None).idle_timeout(None)
    } else {
        builder.max_size(config.pool_size)
    };

    let pool = builder.build(manager)?;
    debug!(database_url = %config.database_url, "connection pool ready");
    Ok(pool)
}

/// Applies pending migrations and returns how many ran.
pub fn run_migrations(pool: &DbPool) -> Result<usize, RestaurantError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| RestaurantError::Migration(e.to_string()))?;
    for version in &applied {
        info!(%version, "applied migration");
    }
    Ok(applied.len())
}
