//! Turns search criteria into a filtered and sorted list of expenses.

use std::cmp::Ordering;

use rusqlite::{Connection, ToSql};
use time::Date;

use crate::{
    Error,
    category::CategoryId,
    expense::{
        core::{Expense, SELECT_EXPENSES, map_expense_row},
        criteria::{SearchCriteria, SortBy, SortOrder},
    },
};

/// A description of which expenses to fetch and how to order them.
///
/// Each builder method returns a new query; nothing touches the database
/// until [ExpenseQuery::fetch].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseQuery {
    name_contains: Option<String>,
    date_from: Option<Date>,
    date_to: Option<Date>,
    categories: Vec<CategoryId>,
    sort_by: SortBy,
    order: SortOrder,
}

impl ExpenseQuery {
    /// A query that matches every expense, sorted by date ascending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the query described by validated `criteria`.
    pub fn from_criteria(criteria: &SearchCriteria) -> Self {
        let mut query = Self::new();

        if let Some(name) = &criteria.name {
            query = query.name_contains(name);
        }
        if let Some(date_from) = criteria.date_from {
            query = query.date_from(date_from);
        }
        if let Some(date_to) = criteria.date_to {
            query = query.date_to(date_to);
        }

        query
            .in_categories(criteria.categories.iter().copied())
            .order_by(criteria.sort_by, criteria.order)
    }

    /// Only match expenses whose name contains `name`, ignoring case.
    pub fn name_contains(self, name: &str) -> Self {
        Self {
            name_contains: Some(name.to_lowercase()),
            ..self
        }
    }

    /// Only match expenses on or after `date`.
    pub fn date_from(self, date: Date) -> Self {
        Self {
            date_from: Some(date),
            ..self
        }
    }

    /// Only match expenses on or before `date`.
    pub fn date_to(self, date: Date) -> Self {
        Self {
            date_to: Some(date),
            ..self
        }
    }

    /// Only match expenses in any of `categories`. An empty set matches everything.
    pub fn in_categories(self, categories: impl IntoIterator<Item = CategoryId>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
            ..self
        }
    }

    pub fn order_by(self, sort_by: SortBy, order: SortOrder) -> Self {
        Self {
            sort_by,
            order,
            ..self
        }
    }

    /// Run the query.
    ///
    /// Rows come back newest first with ties broken by ID, then the requested
    /// sort is applied on top of that order.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    pub fn fetch(&self, connection: &Connection) -> Result<Vec<Expense>, Error> {
        let mut where_clauses: Vec<String> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(date_from) = self.date_from {
            params.push(Box::new(date_from));
            where_clauses.push(format!("expense.date >= ?{}", params.len()));
        }

        if let Some(date_to) = self.date_to {
            params.push(Box::new(date_to));
            where_clauses.push(format!("expense.date <= ?{}", params.len()));
        }

        if !self.categories.is_empty() {
            let mut placeholders = Vec::with_capacity(self.categories.len());
            for category_id in &self.categories {
                params.push(Box::new(*category_id));
                placeholders.push(format!("?{}", params.len()));
            }
            where_clauses.push(format!(
                "expense.category_id IN ({})",
                placeholders.join(", ")
            ));
        }

        let where_clause = if where_clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_clauses.join(" AND "))
        };

        let sql = format!("{SELECT_EXPENSES}{where_clause} ORDER BY expense.date DESC, expense.id ASC");
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|param| param.as_ref()).collect();

        let mut expenses = connection
            .prepare(&sql)?
            .query_map(param_refs.as_slice(), map_expense_row)?
            .collect::<Result<Vec<_>, _>>()?;

        // SQLite's LIKE only folds ASCII, so the name filter runs here.
        if let Some(needle) = &self.name_contains {
            expenses.retain(|expense| expense.name.to_lowercase().contains(needle.as_str()));
        }

        sort_expenses(&mut expenses, self.sort_by, self.order);

        Ok(expenses)
    }
}

/// Stable sort of `expenses` by a single key.
///
/// Sorting by category compares category names. Uncategorized expenses come
/// first in ascending order and last in descending order.
pub fn sort_expenses(expenses: &mut [Expense], sort_by: SortBy, order: SortOrder) {
    let compare = |a: &Expense, b: &Expense| -> Ordering {
        match sort_by {
            SortBy::Date => a.date.cmp(&b.date),
            SortBy::Category => category_name(a).cmp(&category_name(b)),
        }
    };

    match order {
        SortOrder::Asc => expenses.sort_by(compare),
        SortOrder::Desc => expenses.sort_by(|a, b| compare(b, a)),
    }
}

fn category_name(expense: &Expense) -> Option<&str> {
    expense
        .category
        .as_ref()
        .map(|category| category.name.as_ref())
}


#[cfg(test)]
mod fetch_tests {
    use std::str::FromStr;

    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::{Date, macros::date};

    use crate::{
        category::{CategoryId, CategoryName, create_category},
        db::initialize,
        expense::{
            Expense, ExpenseQuery, create_expense,
            criteria::{SearchParams, SortBy, SortOrder, parse_criteria},
        },
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn insert(
        connection: &Connection,
        name: &str,
        amount: &str,
        date: Date,
        category_id: Option<CategoryId>,
    ) -> Expense {
        create_expense(
            Expense::build(name, Decimal::from_str(amount).unwrap(), date).category_id(category_id),
            connection,
        )
        .expect("Could not create test expense")
    }

    fn names(expenses: &[Expense]) -> Vec<&str> {
        expenses.iter().map(|expense| expense.name.as_str()).collect()
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let connection = get_test_connection();
        insert(&connection, "Pizza", "10.00", date!(2024 - 01 - 03), None);
        insert(&connection, "pizza night", "25.00", date!(2024 - 01 - 02), None);
        insert(&connection, "Burger", "8.50", date!(2024 - 01 - 01), None);

        let got = ExpenseQuery::new()
            .name_contains("Pizza")
            .fetch(&connection)
            .unwrap();

        let mut got = names(&got);
        got.sort();
        assert_eq!(got, ["Pizza", "pizza night"]);
    }

    #[test]
    fn name_filter_folds_non_ascii_case() {
        let connection = get_test_connection();
        insert(&connection, "Żurek", "12.00", date!(2024 - 01 - 03), None);
        insert(&connection, "żurek z jajkiem", "15.00", date!(2024 - 01 - 02), None);
        insert(&connection, "Łódź trip", "300.00", date!(2024 - 01 - 01), None);

        let zurek = ExpenseQuery::new()
            .name_contains("żurek")
            .order_by(SortBy::Date, SortOrder::Desc)
            .fetch(&connection)
            .unwrap();
        let lodz = ExpenseQuery::new()
            .name_contains("ŁÓDŹ")
            .fetch(&connection)
            .unwrap();

        assert_eq!(names(&zurek), ["Żurek", "żurek z jajkiem"]);
        assert_eq!(names(&lodz), ["Łódź trip"]);
    }

    #[test]
    fn name_filter_treats_wildcards_literally() {
        let connection = get_test_connection();
        insert(&connection, "100% juice", "3.00", date!(2024 - 01 - 01), None);
        insert(&connection, "1000 juice", "3.00", date!(2024 - 01 - 01), None);
        insert(&connection, "snake_case", "1.00", date!(2024 - 01 - 01), None);
        insert(&connection, "snakeXcase", "1.00", date!(2024 - 01 - 01), None);

        let percent = ExpenseQuery::new()
            .name_contains("0%")
            .fetch(&connection)
            .unwrap();
        let underscore = ExpenseQuery::new()
            .name_contains("e_c")
            .fetch(&connection)
            .unwrap();

        assert_eq!(names(&percent), ["100% juice"]);
        assert_eq!(names(&underscore), ["snake_case"]);
    }

    #[test]
    fn date_range_is_inclusive() {
        let connection = get_test_connection();
        insert(&connection, "before", "1", date!(2023 - 12 - 31), None);
        insert(&connection, "first", "1", date!(2024 - 01 - 01), None);
        insert(&connection, "last", "1", date!(2024 - 01 - 31), None);
        insert(&connection, "after", "1", date!(2024 - 02 - 01), None);

        let got = ExpenseQuery::new()
            .date_from(date!(2024 - 01 - 01))
            .date_to(date!(2024 - 01 - 31))
            .order_by(SortBy::Date, SortOrder::Asc)
            .fetch(&connection)
            .unwrap();

        assert_eq!(names(&got), ["first", "last"]);
    }

    #[test]
    fn category_filter_matches_any_selected_category() {
        let connection = get_test_connection();
        let food = create_category(CategoryName::new_unchecked("Food"), &connection).unwrap();
        let travel = create_category(CategoryName::new_unchecked("Travel"), &connection).unwrap();
        let bills = create_category(CategoryName::new_unchecked("Bills"), &connection).unwrap();
        insert(&connection, "Pizza", "1", date!(2024 - 01 - 03), Some(food.id));
        insert(&connection, "Flight", "1", date!(2024 - 01 - 02), Some(travel.id));
        insert(&connection, "Power", "1", date!(2024 - 01 - 01), Some(bills.id));
        insert(&connection, "Misc", "1", date!(2024 - 01 - 04), None);

        let got = ExpenseQuery::new()
            .in_categories([food.id, travel.id])
            .order_by(SortBy::Date, SortOrder::Desc)
            .fetch(&connection)
            .unwrap();

        assert_eq!(names(&got), ["Pizza", "Flight"]);
    }

    #[test]
    fn filters_are_conjunctive() {
        let connection = get_test_connection();
        let food = create_category(CategoryName::new_unchecked("Food"), &connection).unwrap();
        insert(&connection, "Pizza", "1", date!(2024 - 01 - 03), Some(food.id));
        insert(&connection, "Pizza", "1", date!(2023 - 01 - 03), Some(food.id));
        insert(&connection, "Pizza", "1", date!(2024 - 01 - 03), None);
        insert(&connection, "Burger", "1", date!(2024 - 01 - 03), Some(food.id));

        let criteria = parse_criteria(&SearchParams::from_query(Some(&format!(
            "name=pizza&date_from=2024-01-01&category={}",
            food.id
        ))))
        .unwrap();
        let got = ExpenseQuery::from_criteria(&criteria)
            .fetch(&connection)
            .unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].date, date!(2024 - 01 - 03));
        assert_eq!(got[0].category.as_ref().map(|c| c.id), Some(food.id));
    }

    #[test]
    fn date_ties_keep_id_order() {
        let connection = get_test_connection();
        let day = date!(2024 - 03 - 01);
        let first = insert(&connection, "first", "1", day, None);
        let second = insert(&connection, "second", "1", day, None);
        let earlier = insert(&connection, "earlier", "1", date!(2024 - 02 - 01), None);

        let ascending = ExpenseQuery::new().fetch(&connection).unwrap();

        let ids: Vec<i64> = ascending.iter().map(|expense| expense.id).collect();
        assert_eq!(ids, [earlier.id, first.id, second.id]);
    }

    #[test]
    fn category_sort_uses_names() {
        let connection = get_test_connection();
        // Created in reverse alphabetical order so IDs and names disagree.
        let travel = create_category(CategoryName::new_unchecked("Travel"), &connection).unwrap();
        let food = create_category(CategoryName::new_unchecked("Food"), &connection).unwrap();
        insert(&connection, "Flight", "1", date!(2024 - 01 - 03), Some(travel.id));
        insert(&connection, "Pizza", "1", date!(2024 - 01 - 02), Some(food.id));
        insert(&connection, "Burger", "1", date!(2024 - 01 - 01), Some(food.id));

        let got = ExpenseQuery::new()
            .order_by(SortBy::Category, SortOrder::Asc)
            .fetch(&connection)
            .unwrap();

        assert_eq!(names(&got), ["Pizza", "Burger", "Flight"]);
    }
}
