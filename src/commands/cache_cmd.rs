use clap::{Args, Subcommand};
use sqlx::SqlitePool;

use coop::db::{DocumentRepository, MeasureRepository, PreferenceStore};
use coop::models::TableKey;

#[derive(Args)]
pub struct CacheCommand {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

#[derive(Subcommand)]
pub enum CacheSubcommand {
    /// Show what is cached for a table
    Show {
        /// Table name (users, products, containers, measures, orders, orderLines, news)
        table: String,

        /// Print the cached documents, not just a count
        #[arg(long)]
        full: bool,
    },
}

impl CacheCommand {
    pub async fn run(&self, pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            CacheSubcommand::Show { table, full } => {
                let table: TableKey = table.parse()?;
                let prefs = PreferenceStore::new(pool.clone());

                match prefs.last_sync(table).await? {
                    Some(millis) => println!("{} last synced to remote timestamp {}", table, millis),
                    None => println!("{} has never been synced", table),
                }

                match table {
                    TableKey::Measures => {
                        let measures = MeasureRepository::new(pool.clone()).list().await?;
                        println!("{} measure(s)", measures.len());
                        if *full {
                            for measure in measures {
                                println!("  {:<10} {} ({})", measure.id, measure.name, measure.abbreviation);
                            }
                        }
                    }
                    TableKey::OrderLines => {
                        println!("Use `coop orders list` to see cached order lines.");
                    }
                    _ => {
                        let repo = DocumentRepository::new(pool.clone());
                        println!("{} document(s)", repo.count(table).await?);
                        if *full {
                            for document in repo.list(table).await? {
                                println!("  {}", document);
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
