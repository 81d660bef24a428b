//! The form shared by the create and edit expense pages.

use std::str::FromStr;

use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    category::{Category, CategoryId},
    expense::{Expense, ExpenseBuilder},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The most decimal places an amount may have.
const MAX_DECIMAL_PLACES: u32 = 2;

/// The raw form data for creating or editing an expense.
///
/// Fields are kept as text so that malformed input can be reported instead
/// of rejected by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub name: String,
    pub amount: String,
    pub date: String,
    /// Empty for no category.
    #[serde(default)]
    pub category_id: String,
}

impl ExpenseForm {
    /// Validate the form.
    ///
    /// # Errors
    /// Returns [Error::InvalidExpense] describing the first invalid field.
    pub fn to_builder(&self) -> Result<ExpenseBuilder, Error> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidExpense("Name cannot be empty.".to_owned()));
        }

        let amount = parse_amount(&self.amount)?;

        let date = Date::parse(self.date.trim(), DATE_FORMAT)
            .map_err(|_| Error::InvalidExpense("Enter a valid date.".to_owned()))?;

        let category_id = match self.category_id.trim() {
            "" => None,
            raw_id => Some(raw_id.parse::<CategoryId>().map_err(|_| {
                Error::InvalidExpense(format!("\"{raw_id}\" is not a valid category."))
            })?),
        };

        Ok(Expense::build(name, amount, date).category_id(category_id))
    }
}

fn parse_amount(raw: &str) -> Result<Decimal, Error> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| Error::InvalidExpense("Enter a number for the amount.".to_owned()))?;

    if amount.normalize().scale() > MAX_DECIMAL_PLACES {
        return Err(Error::InvalidExpense(format!(
            "Ensure that the amount has no more than {MAX_DECIMAL_PLACES} decimal places."
        )));
    }

    Ok(amount.round_dp(MAX_DECIMAL_PLACES))
}

/// The initial values of the expense form.
pub struct ExpenseFormDefaults<'a> {
    pub name: Option<&'a str>,
    pub amount: Option<Decimal>,
    pub date: Date,
    pub category_id: Option<CategoryId>,
}

pub fn expense_form_fields(defaults: &ExpenseFormDefaults<'_>, categories: &[Category]) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }

            input
                name="name"
                id="name"
                type="text"
                placeholder="Name"
                value=[defaults.name]
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                placeholder="0.00"
                value=[amount_str.as_deref()]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category_id" id="category_id" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "No category" }

                @for category in categories {
                    option value=(category.id) selected[Some(category.id) == defaults.category_id]
                    {
                        (category.name)
                    }
                }
            }
        }
    }
}
