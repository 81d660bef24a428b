//! The page and endpoint for editing an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    endpoints,
    expense::{
        Expense, ExpenseId,
        form::{ExpenseForm, ExpenseFormDefaults, expense_form_fields},
        get_expense, update_expense,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed to edit an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the edit page for an existing expense, or the 404 page if it does not exist.
pub async fn get_edit_expense_page(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<EditExpenseState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, &connection)?;
    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(edit_expense_view(&expense, &categories).into_response())
}

/// Handle the edit expense form, redirects to the expenses view on success.
pub async fn update_expense_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<EditExpenseState>,
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

    match update_expense(expense_id, builder, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not update expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_expense_view(expense: &Expense, categories: &[Category]) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense.id);
    let update_url = endpoints::format_endpoint(endpoints::EXPENSE, expense.id);
    let nav_bar = NavBar::new(&edit_url).into_html();
    let fields = expense_form_fields(
        &ExpenseFormDefaults {
            name: Some(&expense.name),
            amount: Some(expense.amount),
            date: expense.date,
            category_id: expense.category.as_ref().map(|category| category.id),
        },
        categories,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Expense" }

            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (fields)

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Expense" }
            }
        }
    };

    base("Edit Expense", &content)
}
