use clap::{Args, Subcommand};

use super::OutputFormat;
use coop::db::OrderLineRepository;
use coop::{Config, OrderLine, WeekTime};

#[derive(Args)]
pub struct OrdersCommand {
    #[command(subcommand)]
    pub command: OrdersSubcommand,
}

#[derive(Subcommand)]
pub enum OrdersSubcommand {
    /// List cached order lines for the configured member
    List {
        /// Week number, defaults to the current week
        #[arg(long, short)]
        week: Option<u32>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the cached lines of one order
    Show {
        /// Order ID
        order_id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl OrdersCommand {
    pub async fn run(
        &self,
        repo: &OrderLineRepository,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            OrdersSubcommand::List { week, format } => {
                let user_id = config
                    .user_id
                    .value
                    .as_deref()
                    .ok_or("No user_id configured. Set user_id in config or COOP_USER_ID.")?;
                let week = week.unwrap_or_else(|| {
                    WeekTime::with_override(config.test_date.value).current_week()
                });

                let lines = repo.list_for_user_week(user_id, week).await?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&lines)?),
                    OutputFormat::Text => {
                        if lines.is_empty() {
                            println!("No order lines cached for week {}.", week);
                        } else {
                            println!("Week {}", week);
                            print_lines(&lines);
                        }
                    }
                }
            }
            OrdersSubcommand::Show { order_id, format } => {
                let lines = repo.list_for_order(order_id).await?;
                if lines.is_empty() {
                    return Err(format!("Order not found: {}", order_id).into());
                }
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&lines)?),
                    OutputFormat::Text => {
                        println!("Order {} (week {})", order_id, lines[0].week);
                        print_lines(&lines);
                    }
                }
            }
        }

        Ok(())
    }
}

fn print_lines(lines: &[OrderLine]) {
    let mut current_order: Option<&str> = None;
    for line in lines {
        if current_order != Some(line.order_id.as_str()) {
            println!("  {}", line.order_id);
            current_order = Some(line.order_id.as_str());
        }
        println!("    {}", line);
    }
}
