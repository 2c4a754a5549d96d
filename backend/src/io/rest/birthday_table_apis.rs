use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::io::rest::mappers::BirthdayMapper;
use crate::AppState;
use shared::{
    parse_day_filter, parse_month_filter, FilterCriteria, FilterParseError, NameInitial, PageSpec, PresenceFilter,
    SortDirection, SortKey, SortSpec, TableViewState, DEFAULT_ROWS_PER_PAGE,
};

/// Query parameters for the birthday table API. Everything arrives as text so
/// a bad value can be reported by parameter name.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayTableQuery {
    pub search: Option<String>,
    #[serde(alias = "name")]
    pub name_starts_with: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
    #[serde(alias = "year")]
    pub has_year: Option<String>,
    #[serde(alias = "twitter")]
    pub has_twitter: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    #[serde(alias = "currentPage")]
    pub page: Option<String>,
    #[serde(alias = "perPage")]
    pub rows_per_page: Option<String>,
}

/// A query parameter that failed to parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidParameter {
    pub name: &'static str,
    pub error: FilterParseError,
}

impl std::fmt::Display for InvalidParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid query parameter {}: {}", self.name, self.error)
    }
}

fn parse_param<T>(
    name: &'static str,
    value: &Option<String>,
    parse: impl FnOnce(&str) -> Result<T, FilterParseError>,
) -> Result<Option<T>, InvalidParameter> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse(raw).map(Some).map_err(|error| InvalidParameter { name, error }),
    }
}

fn parse_number(raw: &str) -> Result<u32, FilterParseError> {
    raw.parse().map_err(|_| FilterParseError::NotANumber(raw.to_string()))
}

impl BirthdayTableQuery {
    pub fn into_view_state(self) -> Result<TableViewState, InvalidParameter> {
        let name_starts_with = match self.name_starts_with.as_deref().map(str::trim) {
            Some(raw) if raw.eq_ignore_ascii_case("all") => None,
            _ => parse_param("nameStartsWith", &self.name_starts_with, str::parse::<NameInitial>)?,
        };

        let filters = FilterCriteria {
            search: self.search.filter(|s| !s.is_empty()),
            name_starts_with,
            month: parse_param("month", &self.month, parse_month_filter)?.flatten(),
            day: parse_param("day", &self.day, parse_day_filter)?.flatten(),
            has_year: parse_param("hasYear", &self.has_year, str::parse::<PresenceFilter>)?.unwrap_or_default(),
            has_twitter: parse_param("hasTwitter", &self.has_twitter, str::parse::<PresenceFilter>)?
                .unwrap_or_default(),
        };

        let sort = SortSpec {
            key: parse_param("sortBy", &self.sort_by, str::parse::<SortKey>)?.unwrap_or_default(),
            direction: parse_param("sortDirection", &self.sort_direction, str::parse::<SortDirection>)?
                .unwrap_or_default(),
        };

        let current_page = parse_param("page", &self.page, parse_number)?.unwrap_or(1);
        let rows_per_page =
            parse_param("rowsPerPage", &self.rows_per_page, parse_number)?.unwrap_or(DEFAULT_ROWS_PER_PAGE);
        let page = PageSpec::new(current_page, rows_per_page).map_err(|e| InvalidParameter {
            name: if current_page == 0 { "page" } else { "rowsPerPage" },
            error: e.into(),
        })?;

        Ok(TableViewState::new(filters, sort, page))
    }
}

/// Create a router for birthday table related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/table", get(get_birthday_table))
}

/// Filtered, sorted and paginated view of the current snapshot
async fn get_birthday_table(
    State(state): State<AppState>,
    Query(query): Query<BirthdayTableQuery>,
) -> impl IntoResponse {
    info!("GET /api/birthdays/table - query: {:?}", query);

    let view = match query.into_view_state() {
        Ok(view) => view,
        Err(e) => {
            warn!("Rejected table query: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    match state.birthday_service.list_birthdays().await {
        Ok(birthdays) => {
            let table = state.birthday_table_service.derive_view(&birthdays, &view);
            (StatusCode::OK, Json(BirthdayMapper::to_table_response(table))).into_response()
        }
        Err(e) => {
            error!("Failed to get birthday table data: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error getting birthday table").into_response()
        }
    }
}
