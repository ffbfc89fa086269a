//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                     - Catalog page (header, search, grid, cart panel)
//! GET  /health               - Health check
//!
//! # Products (HTMX fragments)
//! GET  /products/search      - Debounced search (?value=), 204 when superseded
//!
//! # Cart (HTMX fragments, requires login)
//! POST /cart/add             - Add product, rejects duplicates
//! POST /cart/update          - Set quantity (0 removes)
//!
//! # Auth
//! GET  /login                - Login page
//! POST /login                - Login action
//! GET  /register             - Register page
//! POST /register             - Register action
//! POST /logout               - Logout action
//! ```
//!
//! Rejections on fragment routes answer with `HX-Reswap: none` and an
//! out-of-band notification, leaving the rest of the page untouched.

pub mod auth;
pub mod cart;
pub mod home;
pub mod search;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::Uri,
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
};

use crate::error::AppError;
use crate::models::Notification;
use crate::qkart::{ApiError, PRODUCTS_UNAVAILABLE_MESSAGE};
use crate::state::AppState;

/// Out-of-band notifications fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/notifications_oob.html")]
pub struct NotificationsTemplate {
    pub notifications: Vec<Notification>,
}

/// Respond with notifications only; HTMX keeps the swap target as it is.
pub(crate) fn notify_only(notifications: Vec<Notification>) -> Response {
    (
        AppendHeaders([("HX-Reswap", "none")]),
        NotificationsTemplate { notifications },
    )
        .into_response()
}

/// Notification for a failed catalog or search call.
///
/// Server errors surface the API's own message when it sent one.
pub(crate) fn products_error(err: &ApiError) -> Notification {
    match err.server_message() {
        Some(message) if err.is_server_error() => Notification::error(message),
        _ => Notification::error(err.user_message(PRODUCTS_UNAVAILABLE_MESSAGE)),
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog page
        .route("/", get(home::home))
        // Search fragment
        .route("/products/search", get(search::search))
        // Cart fragments
        .nest("/cart", cart_routes())
        // Auth routes
        .merge(auth_routes())
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Level;
    use crate::qkart::CONNECTIVITY_MESSAGE;

    #[test]
    fn test_products_error_uses_server_message_for_5xx() {
        let err = ApiError::Status {
            status: 500,
            message: Some("Database is down".to_string()),
        };
        let notification = products_error(&err);
        assert_eq!(notification.level, Level::Error);
        assert_eq!(notification.message, "Database is down");
    }

    #[test]
    fn test_products_error_falls_back_without_message() {
        let err = ApiError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(products_error(&err).message, PRODUCTS_UNAVAILABLE_MESSAGE);
        assert_ne!(products_error(&err).message, CONNECTIVITY_MESSAGE);
    }
}
