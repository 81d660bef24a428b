//! Defines the core data model and database queries for expenses.

use std::str::FromStr;

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
};

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// Money spent on something, on a given day.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub name: String,
    /// How much was spent.
    pub amount: Decimal,
    /// When the money was spent.
    pub date: Date,
    /// The category the expense belongs to, if any.
    pub category: Option<Category>,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(name: &str, amount: Decimal, date: Date) -> ExpenseBuilder {
        ExpenseBuilder {
            name: name.to_owned(),
            amount,
            date,
            category_id: None,
        }
    }
}

/// The fields needed to insert or overwrite an expense.
#[derive(Debug, PartialEq, Clone)]
pub struct ExpenseBuilder {
    pub name: String,
    pub amount: Decimal,
    pub date: Date,
    pub category_id: Option<CategoryId>,
}

impl ExpenseBuilder {
    /// Set the category for the expense.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }
}

/// The columns read by [map_expense_row], with the category joined in.
pub(crate) const SELECT_EXPENSES: &str = "SELECT expense.id, expense.name, expense.amount, \
    expense.date, category.id, category.name \
    FROM expense LEFT JOIN category ON category.id = expense.category_id";

/// Create a new expense in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(builder: ExpenseBuilder, connection: &Connection) -> Result<Expense, Error> {
    connection
        .execute(
            "INSERT INTO expense (name, amount, date, category_id) VALUES (?1, ?2, ?3, ?4)",
            (
                &builder.name,
                builder.amount.to_string(),
                builder.date,
                builder.category_id,
            ),
        )
        .map_err(|error| map_foreign_key_violation(error, builder.category_id))?;

    get_expense(connection.last_insert_rowid(), connection)
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(&format!("{SELECT_EXPENSES} WHERE expense.id = :id"))?
        .query_row(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// Overwrite the expense `id` with the fields in `builder`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if `id` does not refer to a valid expense,
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    builder: ExpenseBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE expense SET name = ?1, amount = ?2, date = ?3, category_id = ?4 WHERE id = ?5",
            (
                &builder.name,
                builder.amount.to_string(),
                builder.date,
                builder.category_id,
                id,
            ),
        )
        .map_err(|error| map_foreign_key_violation(error, builder.category_id))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(())
}

/// Delete the expense `id`.
///
/// # Errors
/// Returns [Error::DeleteMissingExpense] if `id` does not refer to a valid expense.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Create the expense table in the database.
///
/// The category table must be created first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                amount TEXT NOT NULL,
                date TEXT NOT NULL,
                category_id INTEGER,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Composite index for the date range and category filters.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_date_category ON expense(date, category_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row selected with [SELECT_EXPENSES] to an Expense.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let raw_amount: String = row.get(2)?;
    let amount = Decimal::from_str(&raw_amount).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(error))
    })?;
    let date = row.get(3)?;
    let category_id: Option<CategoryId> = row.get(4)?;
    let category_name: Option<String> = row.get(5)?;

    let category = category_id
        .zip(category_name)
        .map(|(id, name)| Category {
            id,
            name: CategoryName::new_unchecked(&name),
        });

    Ok(Expense {
        id,
        name,
        amount,
        date,
        category,
    })
}

fn map_foreign_key_violation(error: rusqlite::Error, category_id: Option<CategoryId>) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidCategory(category_id),
        error => error.into(),
    }
}
