use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::models::WeekDay;

/// Even or odd delivery week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekParity {
    Even,
    Odd,
}

impl WeekParity {
    pub fn of(week: u32) -> Self {
        if week % 2 == 0 {
            WeekParity::Even
        } else {
            WeekParity::Odd
        }
    }
}

impl fmt::Display for WeekParity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekParity::Even => write!(f, "even"),
            WeekParity::Odd => write!(f, "odd"),
        }
    }
}

/// Week numbers relative to a reference date.
///
/// The reference date is today unless an override is supplied, which is how
/// tests and the `test_date` config setting pin the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekTime {
    reference: NaiveDate,
}

impl WeekTime {
    pub fn at(reference: NaiveDate) -> Self {
        Self { reference }
    }

    pub fn today() -> Self {
        Self::at(Local::now().date_naive())
    }

    /// Uses `test_date` when set, today otherwise.
    pub fn with_override(test_date: Option<NaiveDate>) -> Self {
        match test_date {
            Some(date) => Self::at(date),
            None => Self::today(),
        }
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference
    }

    pub fn current_week(&self) -> u32 {
        self.reference.iso_week().week()
    }

    pub fn last_week(&self) -> u32 {
        self.weeks_ago(1)
    }

    pub fn two_weeks_ago(&self) -> u32 {
        self.weeks_ago(2)
    }

    /// ISO year owning the current week; differs from the calendar year
    /// around New Year.
    pub fn iso_year(&self) -> i32 {
        self.reference.iso_week().year()
    }

    /// Monday = 1 through Sunday = 7.
    pub fn day_of_week(&self) -> u32 {
        self.reference.weekday().number_from_monday()
    }

    pub fn week_day(&self) -> WeekDay {
        self.reference.weekday().into()
    }

    pub fn current_parity(&self) -> WeekParity {
        WeekParity::of(self.current_week())
    }

    pub fn is_even_week(&self) -> bool {
        self.current_parity() == WeekParity::Even
    }

    /// Date of the given day within the reference week.
    pub fn date_of(&self, day: WeekDay) -> NaiveDate {
        let offset = day.ordinal() as i64 - self.week_day().ordinal() as i64;
        self.reference + Duration::days(offset)
    }

    fn weeks_ago(&self, weeks: i64) -> u32 {
        (self.reference - Duration::weeks(weeks)).iso_week().week()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_numbers_mid_year() {
        // Wednesday of ISO week 24
        let time = WeekTime::at(date(2025, 6, 11));
        assert_eq!(time.current_week(), 24);
        assert_eq!(time.last_week(), 23);
        assert_eq!(time.two_weeks_ago(), 22);
        assert_eq!(time.day_of_week(), 3);
        assert_eq!(time.week_day(), WeekDay::Wednesday);
    }

    #[test]
    fn test_week_numbers_wrap_across_years() {
        // 2025-01-06 is Monday of ISO week 2; 2024 has 52 ISO weeks
        let time = WeekTime::at(date(2025, 1, 6));
        assert_eq!(time.current_week(), 2);
        assert_eq!(time.last_week(), 1);
        assert_eq!(time.two_weeks_ago(), 52);

        // 2021-01-04 is Monday of week 1; 2020 has 53 ISO weeks
        let time = WeekTime::at(date(2021, 1, 4));
        assert_eq!(time.current_week(), 1);
        assert_eq!(time.last_week(), 53);
    }

    #[test]
    fn test_iso_year_differs_near_new_year() {
        // Sunday 2023-01-01 belongs to ISO week 52 of 2022
        let time = WeekTime::at(date(2023, 1, 1));
        assert_eq!(time.current_week(), 52);
        assert_eq!(time.iso_year(), 2022);
        assert_eq!(time.day_of_week(), 7);
    }

    #[test]
    fn test_parity() {
        assert_eq!(WeekParity::of(24), WeekParity::Even);
        assert_eq!(WeekParity::of(1), WeekParity::Odd);

        let time = WeekTime::at(date(2025, 6, 11));
        assert_eq!(time.current_parity(), WeekParity::Even);
        assert!(time.is_even_week());
    }

    #[test]
    fn test_override() {
        let pinned = date(2024, 2, 29);
        assert_eq!(WeekTime::with_override(Some(pinned)).reference_date(), pinned);
    }

    #[test]
    fn test_date_of() {
        let time = WeekTime::at(date(2025, 6, 11));
        assert_eq!(time.date_of(WeekDay::Monday), date(2025, 6, 9));
        assert_eq!(time.date_of(WeekDay::Sunday), date(2025, 6, 15));
    }
}
