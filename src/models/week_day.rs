use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the delivery week. Declaration order is week order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekDay {
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
        WeekDay::Sunday,
    ];

    /// Zero-based position in the week (Monday = 0).
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// ISO day number, Monday = 1 through Sunday = 7.
    pub fn number(self) -> u32 {
        self.ordinal() as u32 + 1
    }

    /// Offset by `days`, wrapping around the week in either direction.
    pub fn plus_days(self, days: i64) -> Self {
        let index = (self.ordinal() as i64 + days).rem_euclid(7) as usize;
        Self::ALL[index]
    }

    pub fn minus_days(self, days: i64) -> Self {
        self.plus_days(-days)
    }

    pub fn next(self) -> Self {
        self.plus_days(1)
    }

    pub fn previous(self) -> Self {
        self.plus_days(-1)
    }

    /// Days to walk forward from `self` to reach `other` (0..=6).
    pub fn days_until(self, other: WeekDay) -> u32 {
        (other.ordinal() as i64 - self.ordinal() as i64).rem_euclid(7) as u32
    }

    /// Order cutoff day for a delivery on `self`.
    ///
    /// Weekend deliveries have no reserved day; callers must handle `None`.
    pub fn reserved_day(self) -> Option<WeekDay> {
        match self {
            WeekDay::Monday => Some(WeekDay::Tuesday),
            WeekDay::Tuesday => Some(WeekDay::Wednesday),
            WeekDay::Wednesday => Some(WeekDay::Thursday),
            WeekDay::Thursday => Some(WeekDay::Friday),
            WeekDay::Friday => Some(WeekDay::Saturday),
            WeekDay::Saturday | WeekDay::Sunday => None,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            WeekDay::Monday => "mon",
            WeekDay::Tuesday => "tue",
            WeekDay::Wednesday => "wed",
            WeekDay::Thursday => "thu",
            WeekDay::Friday => "fri",
            WeekDay::Saturday => "sat",
            WeekDay::Sunday => "sun",
        }
    }
}

/// Free-function form of [`WeekDay::reserved_day`].
pub fn reserved_day_for(delivery_day: WeekDay) -> Option<WeekDay> {
    delivery_day.reserved_day()
}

impl From<chrono::Weekday> for WeekDay {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl From<WeekDay> for chrono::Weekday {
    fn from(day: WeekDay) -> Self {
        match day {
            WeekDay::Monday => chrono::Weekday::Mon,
            WeekDay::Tuesday => chrono::Weekday::Tue,
            WeekDay::Wednesday => chrono::Weekday::Wed,
            WeekDay::Thursday => chrono::Weekday::Thu,
            WeekDay::Friday => chrono::Weekday::Fri,
            WeekDay::Saturday => chrono::Weekday::Sat,
            WeekDay::Sunday => chrono::Weekday::Sun,
        }
    }
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekDay::Monday => write!(f, "monday"),
            WeekDay::Tuesday => write!(f, "tuesday"),
            WeekDay::Wednesday => write!(f, "wednesday"),
            WeekDay::Thursday => write!(f, "thursday"),
            WeekDay::Friday => write!(f, "friday"),
            WeekDay::Saturday => write!(f, "saturday"),
            WeekDay::Sunday => write!(f, "sunday"),
        }
    }
}

impl FromStr for WeekDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        WeekDay::ALL
            .into_iter()
            .find(|day| day.to_string() == lower || day.short_name() == lower)
            .ok_or_else(|| {
                format!(
                    "Invalid week day '{}'. Valid options: monday..sunday or mon..sun",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_follows_week_order() {
        for (i, day) in WeekDay::ALL.iter().enumerate() {
            assert_eq!(day.ordinal(), i);
            assert_eq!(WeekDay::from_ordinal(i), Some(*day));
        }
        assert!(WeekDay::Monday < WeekDay::Sunday);
        assert_eq!(WeekDay::from_ordinal(7), None);
    }

    #[test]
    fn test_plus_days_is_cyclic() {
        for day in WeekDay::ALL {
            assert_eq!(day.plus_days(7), day);
            assert_eq!(day.plus_days(-7), day);
            assert_eq!(day.plus_days(14), day);
        }
    }

    #[test]
    fn test_plus_days_wraps() {
        assert_eq!(WeekDay::Sunday.plus_days(1), WeekDay::Monday);
        assert_eq!(WeekDay::Friday.plus_days(3), WeekDay::Monday);
        assert_eq!(WeekDay::Monday.minus_days(1), WeekDay::Sunday);
        assert_eq!(WeekDay::Tuesday.plus_days(-9), WeekDay::Sunday);
    }

    #[test]
    fn test_next_and_previous() {
        assert_eq!(WeekDay::Monday.next(), WeekDay::Tuesday);
        assert_eq!(WeekDay::Sunday.next(), WeekDay::Monday);
        assert_eq!(WeekDay::Monday.previous(), WeekDay::Sunday);
    }

    #[test]
    fn test_days_until() {
        assert_eq!(WeekDay::Monday.days_until(WeekDay::Wednesday), 2);
        assert_eq!(WeekDay::Friday.days_until(WeekDay::Monday), 3);
        assert_eq!(WeekDay::Thursday.days_until(WeekDay::Thursday), 0);
    }

    #[test]
    fn test_reserved_day() {
        assert_eq!(reserved_day_for(WeekDay::Monday), Some(WeekDay::Tuesday));
        assert_eq!(reserved_day_for(WeekDay::Thursday), Some(WeekDay::Friday));
        assert_eq!(reserved_day_for(WeekDay::Friday), Some(WeekDay::Saturday));
        assert_eq!(reserved_day_for(WeekDay::Saturday), None);
        assert_eq!(reserved_day_for(WeekDay::Sunday), None);
    }

    #[test]
    fn test_chrono_conversion() {
        assert_eq!(WeekDay::from(chrono::Weekday::Sun), WeekDay::Sunday);
        assert_eq!(chrono::Weekday::from(WeekDay::Wednesday), chrono::Weekday::Wed);
        assert_eq!(WeekDay::Sunday.number(), 7);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(WeekDay::from_str("Friday").unwrap(), WeekDay::Friday);
        assert_eq!(WeekDay::from_str("SAT").unwrap(), WeekDay::Saturday);
        assert!(WeekDay::from_str("someday").is_err());
    }
}
