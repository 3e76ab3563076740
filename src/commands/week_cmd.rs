use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use super::OutputFormat;
use coop::{Config, ProducerType, WeekDay, WeekParity, WeekTime};

/// Show delivery week information
#[derive(Args)]
pub struct WeekCommand {
    /// Reference date (YYYY-MM-DD), defaults to test_date or today
    #[arg(long)]
    date: Option<String>,

    /// Delivery day to compute the reserved day for
    #[arg(long, default_value = "wednesday")]
    delivery_day: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct WeekSummary {
    date: NaiveDate,
    iso_year: i32,
    current_week: u32,
    last_week: u32,
    two_weeks_ago: u32,
    parity: WeekParity,
    day_of_week: u32,
    delivery_day: WeekDay,
    reserved_day: Option<WeekDay>,
    delivering: Vec<ProducerType>,
}

impl WeekCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let reference = match &self.date {
            Some(date) => Some(
                NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD", date))?,
            ),
            None => config.test_date.value,
        };
        let time = WeekTime::with_override(reference);
        let delivery_day: WeekDay = self.delivery_day.parse()?;

        let summary = WeekSummary {
            date: time.reference_date(),
            iso_year: time.iso_year(),
            current_week: time.current_week(),
            last_week: time.last_week(),
            two_weeks_ago: time.two_weeks_ago(),
            parity: time.current_parity(),
            day_of_week: time.day_of_week(),
            delivery_day,
            reserved_day: delivery_day.reserved_day(),
            delivering: ProducerType::ALL
                .into_iter()
                .filter(|p| p.delivers_in_week(time.current_week()))
                .collect(),
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            OutputFormat::Text => {
                println!("Date:          {} ({})", summary.date, time.week_day());
                println!(
                    "Week:          {} of {} ({})",
                    summary.current_week, summary.iso_year, summary.parity
                );
                println!("Last week:     {}", summary.last_week);
                println!("Two weeks ago: {}", summary.two_weeks_ago);
                println!("Day of week:   {}", summary.day_of_week);
                println!();
                println!(
                    "Delivery day:  {} ({})",
                    summary.delivery_day,
                    time.date_of(summary.delivery_day)
                );
                match summary.reserved_day {
                    Some(day) => println!("Reserved day:  {}", day),
                    None => println!("Reserved day:  none"),
                }
                let delivering: Vec<String> =
                    summary.delivering.iter().map(|p| p.to_string()).collect();
                println!("Delivering:    {}", delivering.join(", "));
            }
        }

        Ok(())
    }
}
