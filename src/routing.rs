//! Application router configuration.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_edit_category_page, get_new_category_page, update_category_endpoint,
    },
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_edit_expense_page,
        get_expenses_json, get_expenses_page, get_new_expense_page, update_expense_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    logging::logging_middleware,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::NEW_EXPENSE_VIEW, get(get_new_expense_page))
        .route(endpoints::EDIT_EXPENSE_VIEW, get(get_edit_expense_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::EXPENSES_API,
            get(get_expenses_json).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(
            endpoints::CATEGORIES_API,
            post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        );

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root path '/' redirects to the expenses page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::EXPENSES_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{AppState, endpoints, pagination::PaginationConfig};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database");
        let state = AppState::new(connection, "Etc/UTC", PaginationConfig::default())
            .expect("Could not create app state");

        TestServer::new(build_router(state))
    }

    fn expense_names(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("table#expenses tr[data-expense-id] td:nth-child(2)").unwrap())
            .map(|cell| cell.text().collect::<String>())
            .collect()
    }

    #[tokio::test]
    async fn create_then_search_expenses() {
        let server = get_test_server();

        server
            .post(endpoints::CATEGORIES_API)
            .form(&[("name", "Food")])
            .await
            .assert_status(StatusCode::SEE_OTHER);
        for (name, amount, date) in [
            ("Pizza", "12.50", "2024-03-01"),
            ("Burger", "8.25", "2024-03-02"),
        ] {
            server
                .post(endpoints::EXPENSES_API)
                .form(&[
                    ("name", name),
                    ("amount", amount),
                    ("date", date),
                    ("category_id", "1"),
                ])
                .await
                .assert_status(StatusCode::SEE_OTHER);
        }

        let response = server
            .get(endpoints::EXPENSES_VIEW)
            .add_query_param("name", "pizza")
            .await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_eq!(expense_names(&html), ["Pizza"]);
    }

    #[tokio::test]
    async fn json_endpoint_rejects_inverted_date_range() {
        let server = get_test_server();

        let response = server
            .get(endpoints::EXPENSES_API)
            .add_query_param("date_from", "2024-02-01")
            .add_query_param("date_to", "2024-01-01")
            .await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["field_errors"], serde_json::json!({}));
        assert_eq!(json["non_field_errors"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn expense_with_unknown_category_is_rejected() {
        let server = get_test_server();

        server
            .post(endpoints::EXPENSES_API)
            .form(&[
                ("name", "Pizza"),
                ("amount", "12.50"),
                ("date", "2024-03-01"),
                ("category_id", "42"),
            ])
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn deleting_expense_refreshes_list() {
        let server = get_test_server();
        server
            .post(endpoints::EXPENSES_API)
            .form(&[("name", "Pizza"), ("amount", "12.50"), ("date", "2024-03-01")])
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let response = server
            .delete(&endpoints::format_endpoint(endpoints::EXPENSE, 1))
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-refresh"), "true");
        let html = Html::parse_document(&server.get(endpoints::EXPENSES_VIEW).await.text());
        assert!(expense_names(&html).is_empty());
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let server = get_test_server();

        server.get("/does-not-exist").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_category_through_router() {
        let server = get_test_server();
        server
            .post(endpoints::CATEGORIES_API)
            .form(&[("name", "Food")])
            .await
            .assert_status(StatusCode::SEE_OTHER);

        server
            .delete(&endpoints::format_endpoint(endpoints::CATEGORY, 1))
            .await
            .assert_status_ok();
        server
            .delete(&endpoints::format_endpoint(endpoints::CATEGORY, 1))
            .await
            .assert_status_not_found();
    }
}
