//! HTML rendering for the expense list page.

use std::collections::BTreeSet;

use maud::{Markup, html};
use time::Month;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    category::{Category, CategoryId},
    endpoints,
    expense::{
        Expense,
        criteria::{SearchParams, SortBy, SortOrder, ValidationErrors},
        payload::ExpenseListPayload,
        query_string::url_with,
        summary::YearMonthTotal,
    },
    html::{
        BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    pagination::pagination_view,
};

/// The max number of graphemes to display in the expense table rows before
/// truncating and displaying ellipses.
const MAX_NAME_GRAPHEMES: usize = 32;

/// What the list page shows below the search form.
pub(crate) enum ExpenseListResult<'a> {
    Found(&'a ExpenseListPayload),
    Invalid(&'a ValidationErrors),
}

pub(crate) struct ExpenseListView<'a> {
    pub params: &'a SearchParams,
    pub categories: &'a [Category],
    pub result: ExpenseListResult<'a>,
    pub page_size: u64,
    pub max_pages: u64,
}

pub(crate) fn expenses_view(view: ExpenseListView<'_>) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    a href=(endpoints::NEW_EXPENSE_VIEW) class=(LINK_STYLE) { "Add Expense" }
                }

                (search_form_view(view.params, view.categories))

                @match view.result {
                    ExpenseListResult::Invalid(errors) => {
                        (validation_errors_view(errors))
                    }
                    ExpenseListResult::Found(payload) => {
                        (summary_view(payload))
                        (expense_table_view(payload, view.params, view.page_size))
                        (pagination_view(&payload.page, view.max_pages, |page| {
                            url_with(
                                endpoints::EXPENSES_VIEW,
                                view.params,
                                &[("page", &page.to_string())],
                            )
                        }))
                    }
                }
            }
        }
    };

    base("Expenses", &content)
}

fn search_form_view(params: &SearchParams, categories: &[Category]) -> Markup {
    let selected: BTreeSet<CategoryId> = params
        .get_all("category")
        .filter_map(|raw_id| raw_id.trim().parse().ok())
        .collect();
    let sort_by = SortBy::parse_lenient(params.get("sort_by"));
    let order = SortOrder::parse_lenient(params.get("order"));

    html! {
        form
            method="get"
            action=(endpoints::EXPENSES_VIEW)
            id="search-form"
            class="grid grid-cols-1 md:grid-cols-4 gap-4 items-end"
        {
            div
            {
                label for="search-name" class=(FORM_LABEL_STYLE) { "Name" }
                input
                    id="search-name"
                    type="text"
                    name="name"
                    value=[params.get("name")]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="search-date-from" class=(FORM_LABEL_STYLE) { "From" }
                input
                    id="search-date-from"
                    type="date"
                    name="date_from"
                    value=[params.get("date_from")]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="search-date-to" class=(FORM_LABEL_STYLE) { "To" }
                input
                    id="search-date-to"
                    type="date"
                    name="date_to"
                    value=[params.get("date_to")]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="search-category" class=(FORM_LABEL_STYLE) { "Categories" }
                select id="search-category" name="category" multiple class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category in categories {
                        option value=(category.id) selected[selected.contains(&category.id)]
                        {
                            (category.name)
                        }
                    }
                }
            }

            input type="hidden" name="sort_by" value=(sort_by.as_str());
            input type="hidden" name="order" value=(order.as_str());

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Search" }
        }
    }
}

fn validation_errors_view(errors: &ValidationErrors) -> Markup {
    html! {
        ul id="validation-errors" class={ "list-disc pl-6 " (FORM_ERROR_STYLE) }
        {
            @for message in errors.messages() {
                li { (message) }
            }
        }
    }
}

fn summary_view(payload: &ExpenseListPayload) -> Markup {
    html! {
        section id="summary" class="grid grid-cols-1 md:grid-cols-3 gap-4"
        {
            div class="rounded bg-white dark:bg-gray-800 p-4"
            {
                h2 class="text-sm font-semibold text-gray-500 dark:text-gray-400" { "Total spent" }
                p id="total-spent" class="text-2xl font-bold tabular-nums"
                {
                    (format_currency(payload.total_spent))
                }
            }

            div class="rounded bg-white dark:bg-gray-800 p-4"
            {
                h2 class="text-sm font-semibold text-gray-500 dark:text-gray-400" { "By category" }
                table id="summary-per-category" class="w-full text-sm"
                {
                    tbody
                    {
                        @for (name, total) in &payload.summary_per_category {
                            tr
                            {
                                td class="py-1" { (name) }
                                td class="py-1 text-right tabular-nums" { (format_currency(*total)) }
                            }
                        }
                    }
                }
            }

            div class="rounded bg-white dark:bg-gray-800 p-4"
            {
                h2 class="text-sm font-semibold text-gray-500 dark:text-gray-400" { "By month" }
                table id="summary-per-year-month" class="w-full text-sm"
                {
                    tbody
                    {
                        @for month_total in &payload.summary_per_year_month {
                            tr
                            {
                                td class="py-1" { (year_month_label(month_total)) }
                                td class="py-1 text-right tabular-nums"
                                {
                                    (format_currency(month_total.total_amount))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn expense_table_view(payload: &ExpenseListPayload, params: &SearchParams, page_size: u64) -> Markup {
    let first_row_number = (payload.page.number - 1) * page_size + 1;

    html! {
        section class="dark:bg-gray-800 overflow-x-auto"
        {
            table id="expenses" class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "#" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE)
                        {
                            (sort_header_link("Date", SortBy::Date, payload, params))
                        }
                        th scope="col" class=(TABLE_CELL_STYLE)
                        {
                            (sort_header_link("Category", SortBy::Category, payload, params))
                        }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for (offset, expense) in payload.page.items.iter().enumerate() {
                        (expense_row_view(first_row_number + offset as u64, expense))
                    }

                    @if payload.page.items.is_empty() {
                        tr
                        {
                            td colspan="6" class="px-6 py-4 text-center"
                            {
                                "No expenses found."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn sort_header_link(
    label: &str,
    column: SortBy,
    payload: &ExpenseListPayload,
    params: &SearchParams,
) -> Markup {
    let is_active = payload.sort_by == column;
    let next_order = if is_active {
        payload.order.reversed()
    } else {
        SortOrder::Asc
    };
    let href = url_with(
        endpoints::EXPENSES_VIEW,
        params,
        &[
            ("sort_by", column.as_str()),
            ("order", next_order.as_str()),
            ("page", "1"),
        ],
    );
    let arrow = match (is_active, payload.order) {
        (false, _) => "",
        (true, SortOrder::Asc) => " ▲",
        (true, SortOrder::Desc) => " ▼",
    };

    html! {
        a href=(href) class="hover:underline" data-sort=(column.as_str())
        {
            (label) (arrow)
        }
    }
}

fn expense_row_view(row_number: u64, expense: &Expense) -> Markup {
    let (name, tooltip) = format_name(&expense.name);
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense.id);
    let delete_url = endpoints::format_endpoint(endpoints::EXPENSE, expense.id);
    let confirm_message = format!(
        "Are you sure you want to delete the expense '{}'? This cannot be undone.",
        expense.name
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
        {
            td class=(TABLE_CELL_STYLE) { (row_number) }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (name) }
            td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" } { (format_currency(expense.amount)) }
            td class=(TABLE_CELL_STYLE) { time datetime=(expense.date) { (expense.date) } }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(category) = &expense.category {
                    span class=(CATEGORY_BADGE_STYLE) { (category.name) }
                } @else {
                    span class="text-gray-400 dark:text-gray-500" { "-" }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &confirm_message,
                        "closest tr",
                        "delete",
                    ))
                }
            }
        }
    }
}

fn year_month_label(month_total: &YearMonthTotal) -> String {
    match Month::try_from(month_total.month) {
        Ok(month) => format!("{month} {}", month_total.year),
        Err(_) => format!("{}-{:02}", month_total.year, month_total.month),
    }
}

fn format_name(name: &str) -> (String, Option<&str>) {
    let name_length = name.graphemes(true).count();

    if name_length <= MAX_NAME_GRAPHEMES {
        (name.to_owned(), None)
    } else {
        let truncated: String = name.graphemes(true).take(MAX_NAME_GRAPHEMES - 3).collect();
        (truncated + "...", Some(name))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::expense::summary::YearMonthTotal;

    use super::{MAX_NAME_GRAPHEMES, format_name, year_month_label};

    #[test]
    fn short_names_are_not_truncated() {
        assert_eq!(format_name("Pizza"), ("Pizza".to_owned(), None));
    }

    #[test]
    fn long_names_are_truncated_by_grapheme() {
        let name = "🍕".repeat(MAX_NAME_GRAPHEMES + 1);

        let (shown, tooltip) = format_name(&name);

        assert_eq!(shown, format!("{}...", "🍕".repeat(MAX_NAME_GRAPHEMES - 3)));
        assert_eq!(tooltip, Some(name.as_str()));
    }

    #[test]
    fn month_label_uses_month_name() {
        let total = YearMonthTotal {
            year: 2024,
            month: 3,
            total_amount: Decimal::ONE,
        };

        assert_eq!(year_month_label(&total), "March 2024");
    }
}
