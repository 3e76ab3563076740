use clap::{Args, Subcommand};

use super::OutputFormat;
use coop::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("database_path: {}", config.database_path.value.display());
                        println!("  source: {}", config.database_path.source);
                        println!("environment: {}", config.environment.value);
                        println!("  source: {}", config.environment.source);
                        println!(
                            "user_id: {}",
                            config.user_id.value.as_deref().unwrap_or("(not set)")
                        );
                        println!("  source: {}", config.user_id.source);
                        if let Some(date) = config.test_date.value {
                            println!("test_date: {}", date);
                            println!("  source: {}", config.test_date.source);
                        }
                        println!();

                        println!(
                            "remote.base_url: {}",
                            config.remote.base_url.as_deref().unwrap_or("(not set)")
                        );
                        println!(
                            "sync.auto_sync: {}",
                            if config.sync.auto_sync { "enabled" } else { "disabled" }
                        );
                        println!(
                            "sync.min_interval_minutes: {}",
                            config.sync.min_interval_minutes
                        );
                        let critical: Vec<String> = config
                            .sync
                            .critical_tables
                            .iter()
                            .map(|t| t.to_string())
                            .collect();
                        println!("sync.critical_tables: {}", critical.join(", "));
                    }
                }
                Ok(())
            }
        }
    }
}
