//! Combines one page of expenses with the totals over the whole filtered set.

use std::collections::BTreeMap;

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    Error,
    expense::{
        Expense, ExpenseQuery,
        criteria::{SearchCriteria, SortBy, SortOrder},
        summary::{YearMonthTotal, summary_per_category, summary_per_year_month, total_spent},
    },
    pagination::{Page, PageNumber, paginate},
};

/// Everything needed to render the expense list, as HTML or JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseListPayload {
    /// The validated search the payload was built from.
    pub criteria: SearchCriteria,
    /// The sort column, copied from `criteria` so the sort headers and JSON
    /// clients can read it without unpacking the search.
    pub sort_by: SortBy,
    /// The sort direction, copied from `criteria` like `sort_by`.
    pub order: SortOrder,
    pub page: Page<Expense>,
    pub total_spent: Decimal,
    pub summary_per_category: BTreeMap<String, Decimal>,
    pub summary_per_year_month: Vec<YearMonthTotal>,
}

pub fn assemble(
    criteria: SearchCriteria,
    page: Page<Expense>,
    total_spent: Decimal,
    summary_per_category: BTreeMap<String, Decimal>,
    summary_per_year_month: Vec<YearMonthTotal>,
) -> ExpenseListPayload {
    ExpenseListPayload {
        sort_by: criteria.sort_by,
        order: criteria.order,
        criteria,
        page,
        total_spent,
        summary_per_category,
        summary_per_year_month,
    }
}

/// Fetch the expenses matching `criteria` and build the payload for `requested_page`.
///
/// The totals are computed over every matching expense before the page is cut.
pub fn search_expenses(
    criteria: SearchCriteria,
    requested_page: PageNumber,
    page_size: u64,
    connection: &Connection,
) -> Result<ExpenseListPayload, Error> {
    let expenses = ExpenseQuery::from_criteria(&criteria).fetch(connection)?;

    let total = total_spent(&expenses);
    let per_category = summary_per_category(&expenses);
    let per_month = summary_per_year_month(&expenses);
    let page = paginate(expenses, page_size, requested_page);

    Ok(assemble(criteria, page, total, per_category, per_month))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        category::{CategoryName, create_category},
        db::initialize,
        expense::{
            Expense, create_expense,
            criteria::{SearchCriteria, SearchParams, SortBy, SortOrder, parse_criteria},
        },
        pagination::PageNumber,
    };

    use super::search_expenses;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let food = create_category(CategoryName::new_unchecked("Food"), &connection).unwrap();
        let travel = create_category(CategoryName::new_unchecked("Travel"), &connection).unwrap();
        let rows = [
            ("Pizza", "12.50", date!(2024 - 01 - 05), Some(food.id)),
            ("Burger", "8.25", date!(2024 - 01 - 20), Some(food.id)),
            ("Flight", "420.00", date!(2024 - 02 - 11), Some(travel.id)),
            ("Taxi", "33.10", date!(2024 - 02 - 12), Some(travel.id)),
            ("Gift", "40.00", date!(2023 - 12 - 20), None),
            ("pizza night", "30.00", date!(2024 - 03 - 01), Some(food.id)),
            ("Hotel", "210.15", date!(2024 - 03 - 02), Some(travel.id)),
        ];
        for (name, amount, date, category_id) in rows {
            create_expense(
                Expense::build(name, Decimal::from_str(amount).unwrap(), date)
                    .category_id(category_id),
                &connection,
            )
            .unwrap();
        }

        connection
    }

    #[test]
    fn totals_do_not_depend_on_page() {
        let connection = get_test_connection();
        let want_total = Decimal::from_str("754.00").unwrap();

        for (page_size, page) in [(5, 1), (5, 2), (2, 3), (100, 1)] {
            let payload = search_expenses(
                SearchCriteria::default(),
                PageNumber::Number(page),
                page_size,
                &connection,
            )
            .unwrap();

            assert_eq!(payload.total_spent, want_total);
            assert_eq!(
                payload.summary_per_category.values().copied().sum::<Decimal>(),
                want_total
            );
            assert_eq!(payload.page.item_count, 7);
        }
    }

    #[test]
    fn seven_expenses_in_pages_of_five() {
        let connection = get_test_connection();

        let first = search_expenses(
            SearchCriteria::default(),
            PageNumber::Number(1),
            5,
            &connection,
        )
        .unwrap();
        let second = search_expenses(
            SearchCriteria::default(),
            PageNumber::Number(2),
            5,
            &connection,
        )
        .unwrap();

        assert_eq!(first.page.items.len(), 5);
        assert!(first.page.has_next);
        assert_eq!(second.page.items.len(), 2);
        assert!(!second.page.has_next);
    }

    #[test]
    fn surfaces_sort_settings() {
        let connection = get_test_connection();
        let criteria = parse_criteria(&SearchParams::from_query(Some(
            "sort_by=category&order=desc&name=pizza",
        )))
        .unwrap();

        let payload = search_expenses(criteria, PageNumber::default(), 5, &connection).unwrap();

        assert_eq!(payload.sort_by, SortBy::Category);
        assert_eq!(payload.order, SortOrder::Desc);
        assert_eq!(payload.criteria.name.as_deref(), Some("pizza"));
        assert_eq!(payload.page.item_count, 2);
        assert_eq!(payload.total_spent, Decimal::from_str("42.50").unwrap());
    }
}
