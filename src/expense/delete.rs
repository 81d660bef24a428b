//! Expense deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRefresh;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    expense::{ExpenseId, delete_expense},
};

/// The state needed for deleting an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle expense deletion.
///
/// On success the client is told to reload the page so the totals, summaries
/// and pagination match the remaining expenses.
pub async fn delete_expense_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<DeleteExpenseState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expense(expense_id, &connection) {
        Ok(()) => (
            HxRefresh(true),
            Alert::SuccessSimple {
                message: "Expense deleted successfully".to_owned(),
            },
        )
            .into_response(),
        Err(Error::DeleteMissingExpense) => Error::DeleteMissingExpense.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}
