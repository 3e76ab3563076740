use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{
    CacheCommand, ConfigCommand, ContainersCommand, OrdersCommand, SyncCommand, WeekCommand,
};
use coop::db::{init_db, OrderLineRepository};
use coop::sync::try_auto_sync;
use coop::Config;

#[derive(Parser)]
#[command(name = "coop")]
#[command(version)]
#[command(about = "Grocery cooperative client: sync, delivery weeks and containers", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync the local cache with the remote
    Sync(SyncCommand),

    /// Show delivery week, parity and reserved day
    Week(WeekCommand),

    /// List container types allowed for a producer
    Containers(ContainersCommand),

    /// Read cached order lines
    Orders(OrdersCommand),

    /// Inspect cached tables
    Cache(CacheCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coop=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Sync(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            cmd.run(&pool, &config).await?;
        }
        Some(Commands::Week(cmd)) => {
            cmd.run(&config)?;
        }
        Some(Commands::Containers(cmd)) => {
            cmd.run()?;
        }
        Some(Commands::Orders(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            // Auto-sync BEFORE read commands
            try_auto_sync(&config, &pool).await;
            let repo = OrderLineRepository::new(pool);
            cmd.run(&repo, &config).await?;
        }
        Some(Commands::Cache(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            try_auto_sync(&config, &pool).await;
            cmd.run(&pool).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
