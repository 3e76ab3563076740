use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::WeekParity;

/// Role of a producer in the cooperative. Decides delivery weeks and which
/// container types the producer may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerType {
    Regular,
    OddWeek,
    EvenWeek,
    Shop,
}

impl ProducerType {
    pub const ALL: [ProducerType; 4] = [
        ProducerType::Regular,
        ProducerType::OddWeek,
        ProducerType::EvenWeek,
        ProducerType::Shop,
    ];

    /// Whether this producer delivers in the given week number.
    pub fn delivers_in_week(self, week: u32) -> bool {
        match self {
            ProducerType::Regular | ProducerType::Shop => true,
            ProducerType::OddWeek => WeekParity::of(week) == WeekParity::Odd,
            ProducerType::EvenWeek => WeekParity::of(week) == WeekParity::Even,
        }
    }

    /// Producers that commit to delivering on a week schedule.
    pub fn commits_weekly(self) -> bool {
        !matches!(self, ProducerType::Shop)
    }
}

impl fmt::Display for ProducerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProducerType::Regular => write!(f, "regular"),
            ProducerType::OddWeek => write!(f, "odd_week"),
            ProducerType::EvenWeek => write!(f, "even_week"),
            ProducerType::Shop => write!(f, "shop"),
        }
    }
}

impl FromStr for ProducerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "regular" => Ok(ProducerType::Regular),
            "odd_week" | "odd" => Ok(ProducerType::OddWeek),
            "even_week" | "even" => Ok(ProducerType::EvenWeek),
            "shop" => Ok(ProducerType::Shop),
            _ => Err(format!(
                "Invalid producer type '{}'. Valid options: regular, odd_week, even_week, shop",
                s
            )),
        }
    }
}
