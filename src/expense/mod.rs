//! Expenses and the pipeline that searches, sorts, totals and pages them.
//!
//! A request flows one way: the raw query string is validated by
//! [criteria::parse_criteria], turned into an [ExpenseQuery] and fetched,
//! totalled by the functions in [summary], cut into a page by
//! [crate::pagination::paginate] and combined by [payload::assemble].

mod core;
mod create;
pub mod criteria;
mod delete;
mod edit;
mod form;
mod list_page;
pub mod payload;
mod query;
mod query_string;
pub mod summary;
mod view;

pub use self::core::{
    Expense, ExpenseBuilder, ExpenseId, create_expense, create_expense_table, delete_expense,
    get_expense, update_expense,
};
pub use create::{create_expense_endpoint, get_new_expense_page};
pub use delete::delete_expense_endpoint;
pub use edit::{get_edit_expense_page, update_expense_endpoint};
pub use list_page::{get_expenses_json, get_expenses_page};
pub use query::ExpenseQuery;
