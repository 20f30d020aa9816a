use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use pizza_restaurant_service::{establish_pool, run_migrations, DatabaseConfig, RestaurantService};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Manage the pizza restaurant database")]
struct Cli {
    #[command(flatten)]
    database: DatabaseConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Migrate, then insert sample restaurants and pizzas into an empty database
    Seed,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let pool = establish_pool(&cli.database)?;
    let applied = run_migrations(&pool)?;
    info!(applied, database_url = %cli.database.database_url, "migrations done");

    match &cli.command {
        Commands::Migrate => Ok(()),
        Commands::Seed => {
            let report = RestaurantService::new(pool).seed()?;
            if report.restaurants == 0 {
                info!("database already has restaurants, nothing seeded");
            }
            Ok(())
        }
    }
}
