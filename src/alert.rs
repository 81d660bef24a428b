//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as HTML fragments that HTMX swaps into the
//! `#alert-container` element of the base layout.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// An alert message shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// A success message without details.
    SuccessSimple { message: String },
    /// An error message with details on how to fix it.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, message, String::new()),
            Alert::Error { message, details } => (ERROR_STYLE, message, details),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(container_style) role="alert"
                {
                    div class="flex items-start justify-between gap-4"
                    {
                        div
                        {
                            p class="font-medium" { (message) }

                            @if !details.is_empty() {
                                span class="text-sm" { (details) }
                            }
                        }

                        button
                            type="button"
                            class="text-sm font-semibold"
                            onclick="this.closest('#alert-container').classList.add('hidden')"
                            aria-label="Dismiss"
                        {
                            "×"
                        }
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

const SUCCESS_STYLE: &str = "p-4 rounded border border-green-300 bg-green-50 \
    text-green-800 dark:bg-gray-800 dark:text-green-400 dark:border-green-800";

const ERROR_STYLE: &str = "p-4 rounded border border-red-300 bg-red-50 \
    text-red-800 dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{
        alert::Alert,
        test_utils::{assert_valid_html, parse_html_fragment},
    };

    #[tokio::test]
    async fn renders_message_and_details() {
        let alert = Alert::Error {
            message: "Could not delete expense".to_owned(),
            details: "The expense could not be found.".to_owned(),
        };

        let response = alert.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Could not delete expense"));
        assert!(text.contains("The expense could not be found."));
    }
}
