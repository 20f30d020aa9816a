use clap::Args;

const IN_MEMORY: &str = ":memory:";

/// Where the SQLite database lives and how many connections to keep open.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file, or `:memory:`
    #[arg(long = "database-url", env = "DB_URI", default_value = "app.db")]
    pub database_url: String,

    /// Maximum number of pooled connections
    #[arg(long, env = "DB_POOL_SIZE", default_value_t = 5)]
    pub pool_size: u32,
}

impl DatabaseConfig {
    /// A private database that lives as long as its single pooled connection.
    pub fn in_memory() -> Self {
        Self {
            database_url: IN_MEMORY.to_string(),
            pool_size: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url == IN_MEMORY || self.database_url.contains("mode=memory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        database: DatabaseConfig,
    }

    #[test]
    fn test_parse_database_config_from_args() {
        let cli = Cli::parse_from(["cli", "--database-url", "pizza.db", "--pool-size", "2"]);
        assert_eq!(cli.database.database_url, "pizza.db");
        assert_eq!(cli.database.pool_size, 2);
        assert!(!cli.database.is_in_memory());
    }

    #[test]
    fn test_shared_memory_uri_is_in_memory() {
        let shared = DatabaseConfig {
            database_url: "file:pizzas?mode=memory&cache=shared".to_string(),
            pool_size: 5,
        };
        assert!(shared.is_in_memory());

        let file = DatabaseConfig {
            database_url: "app.db".to_string(),
            ..shared
        };
        assert!(!file.is_in_memory());
    }

    #[test]
    fn test_in_memory_config() {
        let config = DatabaseConfig::in_memory();
        assert!(config.is_in_memory());
        assert_eq!(config.pool_size, 1);
    }
}
