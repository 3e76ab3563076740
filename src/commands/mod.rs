mod cache_cmd;
mod config_cmd;
mod containers_cmd;
mod orders_cmd;
mod sync_cmd;
mod week_cmd;

pub use cache_cmd::CacheCommand;
pub use config_cmd::ConfigCommand;
pub use containers_cmd::ContainersCommand;
pub use orders_cmd::OrdersCommand;
pub use sync_cmd::SyncCommand;
pub use week_cmd::WeekCommand;

use clap::ValueEnum;

#[derive(Debug, Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
