//! The page and endpoint for creating an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    endpoints,
    expense::{
        create_expense,
        form::{ExpenseForm, ExpenseFormDefaults, expense_form_fields},
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::current_local_date,
};

/// The state needed to show the new expense page and create expenses.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the page for creating an expense, with the date set to today.
pub async fn get_new_expense_page(
    State(state): State<CreateExpenseState>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(new_expense_view(today, &categories).into_response())
}

/// A route handler for creating a new expense, redirects to the expenses view on success.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let builder = match form.to_builder() {
        Ok(builder) => builder,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_expense(builder, &connection) {
        tracing::error!("could not create expense: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

fn new_expense_view(today: Date, categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_EXPENSE_VIEW).into_html();
    let fields = expense_form_fields(
        &ExpenseFormDefaults {
            name: None,
            amount: None,
            date: today,
            category_id: None,
        },
        categories,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Add Expense" }

            form
                hx-post=(endpoints::EXPENSES_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (fields)

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Expense" }
            }
        }
    };

    base("Add Expense", &content)
}
