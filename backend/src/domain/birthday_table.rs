//! Birthday table view derivation.
//!
//! Turns a full snapshot of birthdays plus the current [`TableViewState`]
//! into the rows for one page. Everything here is pure and synchronous; it is
//! re-run from scratch whenever filters, sort order or page change.
//!
//! ## Rules
//!
//! - Filters are ANDed; an absent filter (or `all`) imposes no constraint
//! - Sorting compares raw strings lexicographically, never as calendar dates
//! - Sorting is stable in both directions, so ties keep snapshot order
//! - Pages past the end are empty, not an error

use std::cmp::Ordering;

use shared::{FilterCriteria, PageSpec, SortDirection, SortKey, SortSpec, TableViewState};

use super::models::Birthday;

/// One page of the filtered, sorted table
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTable {
    pub rows: Vec<Birthday>,
    /// Rows passing the filters, before pagination
    pub total_matched: usize,
    pub page: PageSpec,
    pub page_count: usize,
}

/// Birthday table service; stateless wrapper around [`derive`]
#[derive(Debug, Clone, Default)]
pub struct BirthdayTableService;

impl BirthdayTableService {
    pub fn new() -> Self {
        Self
    }

    pub fn derive_view(&self, birthdays: &[Birthday], view: &TableViewState) -> DerivedTable {
        derive(birthdays, &view.filters, &view.sort, &view.page)
    }
}

pub fn derive(birthdays: &[Birthday], filters: &FilterCriteria, sort: &SortSpec, page: &PageSpec) -> DerivedTable {
    let search = filters.search.as_deref().filter(|s| !s.is_empty()).map(str::to_lowercase);

    let mut matched: Vec<&Birthday> = birthdays
        .iter()
        .filter(|birthday| matches_filters(birthday, filters, search.as_deref()))
        .collect();

    sort_rows(&mut matched, sort);

    let total_matched = matched.len();
    let per_page = page.rows_per_page() as usize;
    let start = (page.current_page() as usize - 1).saturating_mul(per_page);

    let rows = matched.into_iter().skip(start).take(per_page).cloned().collect();

    DerivedTable {
        rows,
        total_matched,
        page: *page,
        page_count: page.page_count(total_matched),
    }
}

/// `search` must already be lowercased
fn matches_filters(birthday: &Birthday, filters: &FilterCriteria, search: Option<&str>) -> bool {
    if let Some(search) = search {
        if !birthday.utaite_name.to_lowercase().contains(search) {
            return false;
        }
    }

    if let Some(initial) = filters.name_starts_with {
        if !initial.matches(&birthday.utaite_name) {
            return false;
        }
    }

    if let Some(month) = filters.month {
        if birthday.birthday_date.month() != month {
            return false;
        }
    }

    if let Some(day) = filters.day {
        if birthday.birthday_date.day() != day {
            return false;
        }
    }

    filters.has_year.admits(birthday.birthday_date.has_year()) && filters.has_twitter.admits(birthday.has_twitter())
}

fn sort_value(birthday: &Birthday, key: SortKey) -> &str {
    match key {
        SortKey::UtaiteName => &birthday.utaite_name,
        SortKey::BirthdayDate => birthday.birthday_date.as_str(),
    }
}

fn sort_rows(rows: &mut [&Birthday], sort: &SortSpec) {
    // slice::sort_by is stable
    rows.sort_by(|a, b| {
        let ordering: Ordering = sort_value(a, sort.key).cmp(sort_value(b, sort.key));
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
