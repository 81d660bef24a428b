//! Categories listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, RawQuery, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, count_expenses_per_category, get_all_categories},
    endpoints,
    expense::criteria::SearchParams,
    html::{
        CATEGORY_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links,
    },
    navigation::NavBar,
    pagination::{Page, PageNumber, PaginationConfig, paginate, pagination_view},
};

/// The state needed for the categories listing page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

struct CategoryRow {
    category: Category,
    expense_count: u32,
}

/// Render one page of categories, ordered by name, with the number of expenses in each.
///
/// The page is read from the `page` query parameter. If it repeats, the last one wins.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, Error> {
    let params = SearchParams::from_query(raw_query.as_deref());

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;
    let expenses_per_category = count_expenses_per_category(&connection)
        .inspect_err(|error| tracing::error!("Could not count expenses per category: {error}"))?;

    let rows = categories
        .into_iter()
        .map(|category| CategoryRow {
            expense_count: expenses_per_category
                .get(&category.id)
                .copied()
                .unwrap_or_default(),
            category,
        })
        .collect();

    let page = paginate(
        rows,
        state.pagination_config.default_page_size,
        PageNumber::parse(params.get("page")),
    );

    Ok(categories_view(&page, state.pagination_config.max_pages).into_response())
}

fn categories_view(page: &Page<CategoryRow>, max_pages: u64) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Categories" }

                    a href=(endpoints::NEW_CATEGORY_VIEW) class=(LINK_STYLE) { "Create Category" }
                }

                section class="dark:bg-gray-800 overflow-x-auto"
                {
                    table id="categories" class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Expenses" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in &page.items {
                                (category_row_view(row))
                            }

                            @if page.items.is_empty() {
                                tr
                                {
                                    td colspan="3" class="px-6 py-4 text-center"
                                    {
                                        "No categories created yet. "
                                        a href=(endpoints::NEW_CATEGORY_VIEW) class=(LINK_STYLE)
                                        {
                                            "Create your first category"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                (pagination_view(page, max_pages, |number| {
                    format!("{}?page={number}", endpoints::CATEGORIES_VIEW)
                }))
            }
        }
    );

    base("Categories", &content)
}

fn category_row_view(row: &CategoryRow) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, row.category.id);
    let delete_url = endpoints::format_endpoint(endpoints::CATEGORY, row.category.id);
    let confirm_message = format!(
        "Are you sure you want to delete '{}'? {} expense(s) will become uncategorized.",
        row.category.name, row.expense_count
    );

    html!(
        tr class=(TABLE_ROW_STYLE) data-category-id=(row.category.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (row.category.name) }
            }
            td class={ (TABLE_CELL_STYLE) " tabular-nums" } { (row.expense_count) }
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
    )
}
