//! Delivery calendar arithmetic.
//!
//! Weeks follow ISO 8601: they start on Monday and week 1 is the week that
//! contains the year's first Thursday. Producers on alternating schedules
//! deliver on odd or even week numbers, so parity is derived from the ISO week
//! number alone.

mod week_time;

pub use week_time::{WeekParity, WeekTime};
