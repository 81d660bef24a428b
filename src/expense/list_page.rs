//! The expense list page and its JSON counterpart.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::get_all_categories,
    expense::{
        criteria::{SearchParams, parse_criteria},
        payload::search_expenses,
        view::{ExpenseListResult, ExpenseListView, expenses_view},
    },
    pagination::{PageNumber, PaginationConfig},
};

/// The state needed for listing expenses.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render the expense list filtered, sorted and paged by the query string.
///
/// Invalid search parameters re-render the page with the errors and a 400 status.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, Error> {
    let params = SearchParams::from_query(raw_query.as_deref());
    let page_size = state.pagination_config.default_page_size;
    let max_pages = state.pagination_config.max_pages;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let criteria = match parse_criteria(&params) {
        Ok(criteria) => criteria,
        Err(errors) => {
            tracing::debug!("rejected search parameters: {errors:?}");
            let view = expenses_view(ExpenseListView {
                params: &params,
                categories: &categories,
                result: ExpenseListResult::Invalid(&errors),
                page_size,
                max_pages,
            });

            return Ok((StatusCode::BAD_REQUEST, view).into_response());
        }
    };

    let payload = search_expenses(
        criteria,
        PageNumber::parse(params.get("page")),
        page_size,
        &connection,
    )
    .inspect_err(|error| tracing::error!("Failed to search expenses: {error}"))?;

    Ok(expenses_view(ExpenseListView {
        params: &params,
        categories: &categories,
        result: ExpenseListResult::Found(&payload),
        page_size,
        max_pages,
    })
    .into_response())
}

/// The same search as [get_expenses_page], as JSON.
pub async fn get_expenses_json(
    State(state): State<ExpensesPageState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, Error> {
    let params = SearchParams::from_query(raw_query.as_deref());

    let criteria = match parse_criteria(&params) {
        Ok(criteria) => criteria,
        Err(errors) => return Ok((StatusCode::BAD_REQUEST, Json(errors)).into_response()),
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let payload = search_expenses(
        criteria,
        PageNumber::parse(params.get("page")),
        state.pagination_config.default_page_size,
        &connection,
    )
    .inspect_err(|error| tracing::error!("Failed to search expenses: {error}"))?;

    Ok(Json(payload).into_response())
}
