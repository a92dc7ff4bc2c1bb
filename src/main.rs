//! servicehub CLI
//!
//! Operates the marketplace store from the command line. Results are
//! printed to stdout as JSON; logs go to stderr.
//!
//! ```sh
//! servicehub seed catalogue.toml
//! servicehub list --category cleaning --city Pune
//! servicehub book --service 1 --customer C9 --provider P1
//! servicehub history --customer C9
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use tracing::{error, info, warn};

use servicehub::application::Marketplace;
use servicehub::catalogue::Catalogue;
use servicehub::config::AppConfig;
use servicehub::domain::{ListingFilter, RepositoryProvider};
use servicehub::infrastructure::database::migrator::Migrator;
use servicehub::shared::telemetry::init_tracing;
use servicehub::{default_config_path, init_database, AppError, SeaOrmRepositoryProvider};

/// Service marketplace: listings and booking requests.
#[derive(Parser, Debug)]
#[command(
    name = "servicehub",
    version,
    about = "Browse service listings and request bookings",
    long_about = "Browse service listings and request bookings.\n\n\
                  Default config: ~/.config/servicehub/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "SERVICEHUB_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the database URL.
    #[arg(long)]
    database_url: Option<String>,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations and exit.
    Migrate,
    /// Load providers and services from a TOML catalogue.
    Seed {
        /// Catalogue file
        path: PathBuf,
    },
    /// List active services with their providers.
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        city: Option<String>,
    },
    /// Request a booking on behalf of a customer.
    Book {
        #[arg(long)]
        service: String,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long)]
        provider: String,
    },
    /// Show a customer's bookings.
    History {
        #[arg(long)]
        customer: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = AppConfig::load(&config_path)?;

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(ref url) = cli.database_url {
        config.database.url = url.clone();
    }
    config.validate()?;

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Database ───────────────────────────────────────────────
    let db = init_database(&config.database).await.map_err(infra)?;

    if cli.no_migrate {
        info!("Skipping migrations");
    } else {
        info!("Running database migrations...");
        Migrator::up(&db, None).await.map_err(infra)?;
        info!("Migrations completed");
    }

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let market = Marketplace::from_config(repos.clone(), &config);

    let result = execute(cli.command, &market, repos.as_ref()).await;

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    }
    result
}

async fn execute(
    command: Command,
    market: &Marketplace,
    repos: &dyn RepositoryProvider,
) -> Result<(), AppError> {
    match command {
        Command::Migrate => print_json(&serde_json::json!({ "migrated": true })),
        Command::Seed { path } => {
            let catalogue = Catalogue::load(&path)?;
            let report = catalogue.seed(repos).await?;
            print_json(&report)
        }
        Command::List { category, city } => {
            let filter = ListingFilter { category, city };
            let listings = market.list_services(&filter).await?;
            print_json(&listings)
        }
        Command::Book {
            service,
            customer,
            provider,
        } => {
            let booking = market
                .request_booking(&service, customer.as_deref(), &provider)
                .await?;
            print_json(&booking)
        }
        Command::History { customer } => {
            let bookings = market.customer_bookings(&customer).await?;
            print_json(&bookings)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value).map_err(infra)?;
    println!("{}", out);
    Ok(())
}

fn infra(e: impl Into<servicehub::InfraError>) -> AppError {
    AppError::Infra(e.into())
}
