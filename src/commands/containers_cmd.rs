use clap::Args;

use super::OutputFormat;
use coop::{allowed_container_types, ProducerType};

/// List the container types a producer may use
#[derive(Args)]
pub struct ContainersCommand {
    /// Producer type (regular, odd_week, even_week, shop)
    #[arg(long = "producer-type", short = 'p', value_name = "TYPE")]
    producer_type: String,

    /// Producer sells tropical fruit
    #[arg(long)]
    tropical: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl ContainersCommand {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let producer_type: ProducerType = self.producer_type.parse()?;
        let containers = allowed_container_types(producer_type, self.tropical);

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&containers)?),
            OutputFormat::Text => {
                println!(
                    "Containers for {}{}:",
                    producer_type,
                    if self.tropical { " (tropical)" } else { "" }
                );
                for container in containers {
                    println!("  {:<16} {}", container.key(), container.label());
                }
            }
        }

        Ok(())
    }
}
