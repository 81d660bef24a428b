//! Totals over a filtered set of expenses.
//!
//! Every function here takes the whole filtered set, never a single page, so
//! the totals do not change as the user pages through the results.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::expense::Expense;

/// The key used for expenses without a category in [summary_per_category].
pub const UNCATEGORIZED_LABEL: &str = "-";

/// The total spent in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearMonthTotal {
    pub year: i32,
    /// The month number, 1 to 12.
    pub month: u8,
    pub total_amount: Decimal,
}

/// The sum of all amounts, zero for no expenses.
pub fn total_spent(expenses: &[Expense]) -> Decimal {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// The sum of amounts for each category name, ordered by name.
///
/// Uncategorized expenses are summed under [UNCATEGORIZED_LABEL].
pub fn summary_per_category(expenses: &[Expense]) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        let name = expense
            .category
            .as_ref()
            .map_or(UNCATEGORIZED_LABEL, |category| category.name.as_ref());

        *totals.entry(name.to_owned()).or_insert(Decimal::ZERO) += expense.amount;
    }

    totals
}

/// The sum of amounts for each month that has expenses, newest month first.
pub fn summary_per_year_month(expenses: &[Expense]) -> Vec<YearMonthTotal> {
    let mut totals: BTreeMap<(i32, u8), Decimal> = BTreeMap::new();

    for expense in expenses {
        let key = (expense.date.year(), u8::from(expense.date.month()));
        *totals.entry(key).or_insert(Decimal::ZERO) += expense.amount;
    }

    totals
        .into_iter()
        .rev()
        .map(|((year, month), total_amount)| YearMonthTotal {
            year,
            month,
            total_amount,
        })
        .collect()
}
