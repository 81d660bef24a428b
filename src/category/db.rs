//! Database operations for categories.

use std::collections::HashMap;

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if a category with the same name already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    connection
        .execute("INSERT INTO category (name) VALUES (?1);", (name.as_ref(),))
        .map_err(|error| map_unique_violation(error, &name))?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category ORDER BY name ASC, id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Rename a category. Returns an error if the category doesn't exist.
pub fn update_category(
    category_id: CategoryId,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1 WHERE id = ?2",
            (new_name.as_ref(), category_id),
        )
        .map_err(|error| map_unique_violation(error, &new_name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete a category by ID. Returns an error if the category doesn't exist.
///
/// Expenses in the category are kept and become uncategorized.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Count the expenses in each category.
///
/// Categories without any expenses are absent from the map.
pub fn count_expenses_per_category(
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    let result: Result<HashMap<CategoryId, u32>, rusqlite::Error> = connection
        .prepare(
            "SELECT category_id, COUNT(1) FROM expense \
             WHERE category_id IS NOT NULL GROUP BY category_id",
        )?
        .query_map((), |row| {
            let category_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((category_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );",
        (),
    )?;

    Ok(())
}

fn map_unique_violation(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateCategoryName(name.to_string()),
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}
