// Cutoff date for selecting inactive users

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use eyre::{Result, eyre};
use std::str::FromStr;

/// A four-digit year; users whose last login is earlier than January 1
/// of this year are inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff {
    date: NaiveDate,
}

impl Cutoff {
    /// Build a cutoff from a year string such as "2023"
    pub fn from_year(year: &str) -> Result<Self> {
        let year = year.trim();
        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(eyre!("Invalid cutoff year: {:?} (expected four digits)", year));
        }

        let value: i32 = year.parse()?;
        let date = NaiveDate::from_ymd_opt(value, 1, 1).ok_or_else(|| eyre!("Cutoff year out of range: {}", value))?;

        Ok(Self { date })
    }

    /// January 1 of the cutoff year
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Date string bound into the selection query, e.g. "2023-01-01"
    pub fn to_sql_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// True if a user with this last login would be selected for downgrade.
    /// Users that never logged in are never selected.
    pub fn includes(&self, last_login: Option<NaiveDateTime>) -> bool {
        match last_login {
            Some(at) => at < self.date.and_time(NaiveTime::MIN),
            None => false,
        }
    }
}

impl FromStr for Cutoff {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_year(s)
    }
}

impl std::fmt::Display for Cutoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql_date())
    }
}
