//! Renaming an existing category.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{CategoryFormData, CategoryId, CategoryName, get_category, update_category},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed to show and submit the edit category form.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the edit form for a category.
///
/// A missing category still renders the page, with the error shown in the form.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (name, error_message) = match get_category(category_id, &connection) {
        Ok(category) => (category.name.to_string(), ""),
        Err(Error::NotFound) => (String::new(), "Category not found"),
        Err(error) => {
            tracing::error!("Failed to retrieve category {category_id}: {error}");
            (String::new(), "Failed to load category")
        }
    };

    Ok(edit_category_view(category_id, &name, error_message).into_response())
}

/// Handle the edit category form, redirecting to the category list on success.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
    Form(form_data): Form<CategoryFormData>,
) -> Response {
    let name = match CategoryName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => {
            return edit_category_form_view(category_id, &form_data.name, &format!("Error: {error}"))
                .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_category(category_id, name, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::UpdateMissingCategory | Error::DuplicateCategoryName(_))) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("could not update category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_category_view(category_id: CategoryId, name: &str, error_message: &str) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id);
    let nav_bar = NavBar::new(&edit_url).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Category" }
            (edit_category_form_view(category_id, name, error_message))
        }
    };

    base("Edit Category", &content)
}

fn edit_category_form_view(category_id: CategoryId, name: &str, error_message: &str) -> Markup {
    let update_url = endpoints::format_endpoint(endpoints::CATEGORY, category_id);

    html! {
        form
            hx-put=(update_url)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Category Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Category Name"
                    value=(name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Category" }
        }
    }
}
