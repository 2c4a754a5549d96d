//! Field rules shared by create and update.
//!
//! Every field is checked on every call so the form can show all problems at
//! once. Nothing here touches storage.

use std::collections::BTreeMap;
use std::fmt;
use url::Url;

use super::commands::birthdays::BirthdayInput;
use super::models::{BirthdayDate, BirthdayFields};

pub const FIELD_UTAITE_NAME: &str = "utaiteName";
pub const FIELD_BIRTHDAY_DATE: &str = "birthdayDate";
pub const FIELD_TWITTER_LINK: &str = "twitterLink";

const NAME_REQUIRED: &str = "Name is required.";
const INVALID_URL: &str = "Please enter a valid URL.";

/// Per-field validation messages keyed by the API field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(|(field, message)| format!("{}: {}", field, message)).collect();
        f.write_str(&joined.join("; "))
    }
}

/// Validate raw input and produce the fields to store
pub fn validate_birthday_input(input: &BirthdayInput) -> Result<BirthdayFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    // Stored as submitted; whitespace alone does not count as a name
    let utaite_name = input.utaite_name.clone();
    if utaite_name.trim().is_empty() {
        errors.add(FIELD_UTAITE_NAME, NAME_REQUIRED);
    }

    let birthday_date = match BirthdayDate::parse(&input.birthday_date) {
        Ok(date) => Some(date),
        Err(e) => {
            errors.add(FIELD_BIRTHDAY_DATE, e.to_string());
            None
        }
    };

    let twitter_link = match normalize_twitter_link(input.twitter_link.as_deref()) {
        Ok(link) => link,
        Err(()) => {
            errors.add(FIELD_TWITTER_LINK, INVALID_URL);
            None
        }
    };

    match birthday_date {
        Some(birthday_date) if errors.is_empty() => Ok(BirthdayFields {
            utaite_name,
            birthday_date,
            twitter_link,
        }),
        _ => Err(errors),
    }
}

/// Blank links become `None`; anything else must parse as an absolute URL and is kept as given
fn normalize_twitter_link(raw: Option<&str>) -> Result<Option<String>, ()> {
    let Some(link) = raw.filter(|link| !link.trim().is_empty()) else {
        return Ok(None);
    };
    match Url::parse(link) {
        Ok(_) => Ok(Some(link.to_string())),
        Err(_) => Err(()),
    }
}
