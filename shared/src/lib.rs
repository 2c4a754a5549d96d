use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub mod form;

pub use form::*;

/// A single utaite birthday as it travels over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayRecord {
    /// Opaque identifier assigned by the repository
    pub id: String,
    pub utaite_name: String,
    /// `MM-DD` or `YYYY-MM-DD`
    pub birthday_date: String,
    pub twitter_link: Option<String>,
    /// RFC 3339 timestamp, set once at creation
    pub created_at: String,
}

/// Body of create and update requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayPayload {
    #[serde(default)]
    pub utaite_name: String,
    #[serde(default, alias = "birthday")]
    pub birthday_date: String,
    /// Empty string is treated the same as absent
    #[serde(default)]
    pub twitter_link: Option<String>,
}

/// Full snapshot of all birthday records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthdayListResponse {
    pub birthdays: Vec<BirthdayRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationOutcome {
    Success,
    Failure,
}

/// Result of create, update and delete calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    pub outcome: MutationOutcome,
    pub message: String,
    /// Per-field messages keyed by the camelCase field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, String>>,
    /// The record as stored after a successful create or update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<BirthdayRecord>,
}

impl MutationResponse {
    pub fn success(message: impl Into<String>, birthday: Option<BirthdayRecord>) -> Self {
        Self {
            outcome: MutationOutcome::Success,
            message: message.into(),
            field_errors: None,
            birthday,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: MutationOutcome::Failure,
            message: message.into(),
            field_errors: None,
            birthday: None,
        }
    }

    pub fn validation_failure(message: impl Into<String>, field_errors: BTreeMap<String, String>) -> Self {
        Self {
            outcome: MutationOutcome::Failure,
            message: message.into(),
            field_errors: Some(field_errors),
            birthday: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == MutationOutcome::Success
    }
}

/// Login form submission
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of login and logout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub authenticated: bool,
}

/// Errors raised while reading table filter, sort or page parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterParseError {
    #[error("nameStartsWith must be a single letter a-z or '#', got '{0}'")]
    InvalidNameInitial(String),
    #[error("expected one of all, yes, no; got '{0}'")]
    InvalidPresence(String),
    #[error("month must be between 1 and 12, got '{0}'")]
    InvalidMonth(String),
    #[error("day must be between 1 and 31, got '{0}'")]
    InvalidDay(String),
    #[error("sort key must be utaiteName or birthdayDate, got '{0}'")]
    InvalidSortKey(String),
    #[error("sort direction must be asc or desc, got '{0}'")]
    InvalidSortDirection(String),
    #[error("{0}")]
    InvalidPage(#[from] PageSpecError),
    #[error("'{0}' is not a whole number")]
    NotANumber(String),
}

/// First-character filter for the name column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NameInitial {
    /// Lowercase ASCII letter, matched case-insensitively
    Letter(char),
    /// `#`: the name does not start with an ASCII letter
    NonLetter,
}

impl NameInitial {
    pub fn matches(&self, name: &str) -> bool {
        match (self, name.chars().next()) {
            (_, None) => false,
            (NameInitial::Letter(letter), Some(first)) => first.to_ascii_lowercase() == *letter,
            (NameInitial::NonLetter, Some(first)) => !first.is_ascii_alphabetic(),
        }
    }
}

impl FromStr for NameInitial {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some('#'), None) => Ok(NameInitial::NonLetter),
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(NameInitial::Letter(c.to_ascii_lowercase())),
            _ => Err(FilterParseError::InvalidNameInitial(s.to_string())),
        }
    }
}

impl TryFrom<String> for NameInitial {
    type Error = FilterParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NameInitial> for String {
    fn from(value: NameInitial) -> Self {
        value.to_string()
    }
}

impl fmt::Display for NameInitial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameInitial::Letter(c) => write!(f, "{}", c),
            NameInitial::NonLetter => write!(f, "#"),
        }
    }
}

/// Three-way filter used by the has-year and has-twitter columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceFilter {
    #[default]
    All,
    Yes,
    No,
}

impl PresenceFilter {
    pub fn admits(&self, present: bool) -> bool {
        match self {
            PresenceFilter::All => true,
            PresenceFilter::Yes => present,
            PresenceFilter::No => !present,
        }
    }
}

impl FromStr for PresenceFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "all" => Ok(PresenceFilter::All),
            "yes" => Ok(PresenceFilter::Yes),
            "no" => Ok(PresenceFilter::No),
            _ => Err(FilterParseError::InvalidPresence(s.to_string())),
        }
    }
}

/// Parse a month filter value; `all` or empty means no constraint
pub fn parse_month_filter(value: &str) -> Result<Option<u8>, FilterParseError> {
    parse_component_filter(value, 12).map_err(|_| FilterParseError::InvalidMonth(value.to_string()))
}

/// Parse a day filter value; `all` or empty means no constraint
pub fn parse_day_filter(value: &str) -> Result<Option<u8>, FilterParseError> {
    parse_component_filter(value, 31).map_err(|_| FilterParseError::InvalidDay(value.to_string()))
}

fn parse_component_filter(value: &str, max: u8) -> Result<Option<u8>, ()> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    match value.parse::<u8>() {
        Ok(n) if (1..=max).contains(&n) => Ok(Some(n)),
        _ => Err(()),
    }
}

/// Filter criteria for the birthday table; all constraints are ANDed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub name_starts_with: Option<NameInitial>,
    pub month: Option<u8>,
    pub day: Option<u8>,
    #[serde(default)]
    pub has_year: PresenceFilter,
    #[serde(default)]
    pub has_twitter: PresenceFilter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    UtaiteName,
    BirthdayDate,
}

impl FromStr for SortKey {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "utaiteName" | "name" => Ok(SortKey::UtaiteName),
            "birthdayDate" | "birthday" => Ok(SortKey::BirthdayDate),
            _ => Err(FilterParseError::InvalidSortKey(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(FilterParseError::InvalidSortDirection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageSpecError {
    #[error("page numbers start at 1")]
    ZeroPage,
    #[error("rows per page must be at least 1")]
    ZeroRowsPerPage,
}

pub const DEFAULT_ROWS_PER_PAGE: u32 = 10;

/// 1-based page selection; both values are always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPageSpec")]
pub struct PageSpec {
    current_page: u32,
    rows_per_page: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPageSpec {
    current_page: u32,
    rows_per_page: u32,
}

impl TryFrom<RawPageSpec> for PageSpec {
    type Error = PageSpecError;

    fn try_from(raw: RawPageSpec) -> Result<Self, Self::Error> {
        PageSpec::new(raw.current_page, raw.rows_per_page)
    }
}

impl PageSpec {
    pub fn new(current_page: u32, rows_per_page: u32) -> Result<Self, PageSpecError> {
        if current_page == 0 {
            return Err(PageSpecError::ZeroPage);
        }
        if rows_per_page == 0 {
            return Err(PageSpecError::ZeroRowsPerPage);
        }
        Ok(Self { current_page, rows_per_page })
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn rows_per_page(&self) -> u32 {
        self.rows_per_page
    }

    /// Same page size, page 1
    pub fn first(&self) -> Self {
        Self { current_page: 1, ..*self }
    }

    /// Number of pages needed to show `total` rows
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.rows_per_page as usize)
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            current_page: 1,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

/// Everything the table view needs to derive its rows.
///
/// Changes go through the `with_*` methods, which hand back a new state.
/// Changing filters or sort order jumps back to the first page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableViewState {
    pub filters: FilterCriteria,
    pub sort: SortSpec,
    pub page: PageSpec,
}

impl TableViewState {
    pub fn new(filters: FilterCriteria, sort: SortSpec, page: PageSpec) -> Self {
        Self { filters, sort, page }
    }

    pub fn with_filters(&self, filters: FilterCriteria) -> Self {
        Self {
            filters,
            sort: self.sort,
            page: self.page.first(),
        }
    }

    pub fn with_sort(&self, sort: SortSpec) -> Self {
        Self {
            filters: self.filters.clone(),
            sort,
            page: self.page.first(),
        }
    }

    pub fn with_page(&self, page: PageSpec) -> Self {
        Self {
            filters: self.filters.clone(),
            sort: self.sort,
            page,
        }
    }
}

/// Derived table rows plus pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayTableResponse {
    pub rows: Vec<BirthdayRecord>,
    pub total_matched: usize,
    pub current_page: u32,
    pub rows_per_page: u32,
    pub page_count: usize,
}
