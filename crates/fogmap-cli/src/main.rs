mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fogmap-cli")]
#[command(about = "Fogmap exploration grid command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Show the grid cell containing a coordinate
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Show the exploration region and its cell count
    Region,
    /// Show exploration coverage for one owner
    Coverage {
        /// Owner id as forwarded by the auth provider
        #[arg(long)]
        owner: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Migrate) => {
            let pool = connect().await?;
            let applied = fogmap_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Some(Commands::Locate { lat, lon }) => {
            println!("{}", report::locate(fogmap_grid::default_enumerator(), lat, lon)?);
        }
        Some(Commands::Region) => {
            println!("{}", report::region(fogmap_grid::default_enumerator()));
        }
        Some(Commands::Coverage { owner }) => {
            let pool = connect().await?;
            report::run_coverage(&pool, &owner).await?;
        }
        None => println!("fogmap-cli ready; see --help for commands"),
    }

    Ok(())
}

async fn connect() -> anyhow::Result<sqlx::PgPool> {
    let config = fogmap_core::load_app_config_from_env()?;
    let pool_config = fogmap_db::PoolConfig::from_app_config(&config);
    Ok(fogmap_db::connect_pool(&config.database_url, pool_config).await?)
}
