//! Database setup shared by the category and expense tables.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, category::create_category_table, expense::create_expense_table};

/// Enable foreign keys and create the tables for categories and expenses.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
