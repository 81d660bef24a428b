//! Validation of the raw search, filter and sort parameters for the expense list.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::category::CategoryId;

/// The error shown when `date_from` is later than `date_to`.
pub const INVALID_DATE_RANGE_MESSAGE: &str =
    "The start date (date_from) cannot be later than the end date (date_to).";

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The raw key/value pairs of a query string, in the order they were received.
///
/// Keys may repeat, e.g. `category=1&category=2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams(Vec<(String, String)>);

impl SearchParams {
    /// Parse a raw, URL-encoded query string.
    ///
    /// A query string that cannot be decoded is treated as empty.
    pub fn from_query(raw_query: Option<&str>) -> Self {
        let Some(raw_query) = raw_query else {
            return Self::default();
        };

        match serde_urlencoded::from_str::<Vec<(String, String)>>(raw_query) {
            Ok(pairs) => Self(pairs),
            Err(error) => {
                tracing::warn!("could not decode query string {raw_query:?}: {error}");
                Self::default()
            }
        }
    }

    /// The last value given for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Every value given for `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// All pairs in the order they were received.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// The field expenses are sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Date,
    /// Sort by category name.
    Category,
}

impl SortBy {
    /// Parse a `sort_by` value, falling back to [SortBy::Date] for anything unrecognised.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("category") => Self::Category,
            _ => Self::Date,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Date => "date",
            SortBy::Category => "category",
        }
    }
}

/// The order for sorting expenses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Sort in order of increasing value.
    #[default]
    Asc,
    /// Sort in order of decreasing value.
    Desc,
}

impl SortOrder {
    /// Parse an `order` value, falling back to [SortOrder::Asc] for anything unrecognised.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// The opposite order.
    pub fn reversed(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// A validated search over expenses.
///
/// Absent filters are `None` or empty and match every expense.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    /// Case-insensitive substring of the expense name.
    pub name: Option<String>,
    /// Earliest date, inclusive.
    pub date_from: Option<Date>,
    /// Latest date, inclusive.
    pub date_to: Option<Date>,
    /// Match expenses in any of these categories.
    pub categories: BTreeSet<CategoryId>,
    pub sort_by: SortBy,
    pub order: SortOrder,
}

/// The reasons a set of search parameters was rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("invalid search parameters")]
pub struct ValidationErrors {
    /// Error messages keyed by parameter name.
    pub field_errors: BTreeMap<String, Vec<String>>,
    /// Errors that involve more than one parameter.
    pub non_field_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    fn add_field_error(&mut self, field: &str, message: String) {
        self.field_errors
            .entry(field.to_owned())
            .or_default()
            .push(message);
    }

    /// Every message, non-field errors first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.non_field_errors
            .iter()
            .chain(self.field_errors.values().flatten())
            .map(String::as_str)
    }
}

/// Validate and normalize the search parameters for the expense list.
///
/// # Errors
///
/// Returns [ValidationErrors] if a date or category ID is malformed, or if
/// `date_from` is later than `date_to`.
pub fn parse_criteria(params: &SearchParams) -> Result<SearchCriteria, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = params
        .get("name")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned);

    let date_from = parse_date(params, "date_from", &mut errors);
    let date_to = parse_date(params, "date_to", &mut errors);

    let mut categories = BTreeSet::new();
    for raw_id in params.get_all("category").map(str::trim) {
        if raw_id.is_empty() {
            continue;
        }

        match raw_id.parse::<CategoryId>() {
            Ok(id) => {
                categories.insert(id);
            }
            Err(_) => errors.add_field_error(
                "category",
                format!("\"{raw_id}\" is not a valid category ID."),
            ),
        }
    }

    if let (Some(from), Some(to)) = (date_from, date_to) {
        if from > to {
            errors
                .non_field_errors
                .push(INVALID_DATE_RANGE_MESSAGE.to_owned());
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(SearchCriteria {
        name,
        date_from,
        date_to,
        categories,
        sort_by: SortBy::parse_lenient(params.get("sort_by")),
        order: SortOrder::parse_lenient(params.get("order")),
    })
}

fn parse_date(params: &SearchParams, field: &str, errors: &mut ValidationErrors) -> Option<Date> {
    let raw = params.get(field).map(str::trim).filter(|raw| !raw.is_empty())?;

    match Date::parse(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(error) => {
            tracing::debug!("could not parse {field}={raw:?} as a date: {error}");
            errors.add_field_error(field, "Enter a valid date.".to_owned());
            None
        }
    }
}

#[cfg(test)]
mod search_params_tests {
    use super::SearchParams;

    #[test]
    fn get_returns_last_value() {
        let params = SearchParams::from_query(Some("name=a&name=b"));

        assert_eq!(params.get("name"), Some("b"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn get_all_keeps_repeated_keys_in_order() {
        let params = SearchParams::from_query(Some("category=2&name=x&category=1"));

        assert_eq!(params.get_all("category").collect::<Vec<_>>(), ["2", "1"]);
    }

    #[test]
    fn decodes_percent_encoding() {
        let params = SearchParams::from_query(Some("name=pizza%20night&x=a+b"));

        assert_eq!(params.get("name"), Some("pizza night"));
        assert_eq!(params.get("x"), Some("a b"));
    }
}
