use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static BIRTHDAY_DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4}-)?[0-9]{2}-[0-9]{2}$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BirthdayDateError {
    #[error("Date must be in YYYY-MM-DD or MM-DD format.")]
    InvalidShape,
    #[error("Date must use a month between 01 and 12 and a day between 01 and 31.")]
    OutOfRange,
}

/// A birthday in `MM-DD` or `YYYY-MM-DD` form.
///
/// The raw text is kept as entered; sorting compares it lexicographically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayDate {
    raw: String,
    month: u8,
    day: u8,
    has_year: bool,
}

impl BirthdayDate {
    pub fn parse(raw: &str) -> Result<Self, BirthdayDateError> {
        if !BIRTHDAY_DATE_SHAPE.is_match(raw) {
            return Err(BirthdayDateError::InvalidShape);
        }

        let has_year = raw.len() == 10;
        let month_day = if has_year { &raw[5..] } else { raw };
        let month: u8 = month_day[0..2].parse().map_err(|_| BirthdayDateError::InvalidShape)?;
        let day: u8 = month_day[3..5].parse().map_err(|_| BirthdayDateError::InvalidShape)?;

        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(BirthdayDateError::OutOfRange);
        }

        Ok(Self {
            raw: raw.to_string(),
            month,
            day,
            has_year,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// True when the date starts with a 4-digit year
    pub fn has_year(&self) -> bool {
        self.has_year
    }
}

impl fmt::Display for BirthdayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The user-editable part of a birthday, already validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayFields {
    pub utaite_name: String,
    pub birthday_date: BirthdayDate,
    pub twitter_link: Option<String>,
}

/// A stored birthday record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Birthday {
    pub id: String,
    pub utaite_name: String,
    pub birthday_date: BirthdayDate,
    pub twitter_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Birthday {
    pub fn new(id: String, fields: BirthdayFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            utaite_name: fields.utaite_name,
            birthday_date: fields.birthday_date,
            twitter_link: fields.twitter_link,
            created_at,
        }
    }

    /// Replace the editable fields; `id` and `created_at` stay put
    pub fn apply(&mut self, fields: BirthdayFields) {
        self.utaite_name = fields.utaite_name;
        self.birthday_date = fields.birthday_date;
        self.twitter_link = fields.twitter_link;
    }

    pub fn has_twitter(&self) -> bool {
        self.twitter_link.as_deref().is_some_and(|link| !link.is_empty())
    }
}
