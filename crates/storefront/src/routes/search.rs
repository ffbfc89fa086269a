//! Product search handler.
//!
//! Every keystroke in the search box is a request here. Requests from one
//! browser session share a debouncer: superseded requests answer
//! `204 No Content` straight away, which HTMX ignores, and only the last
//! request in a burst reaches the API.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use qkart_core::Product;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use super::{notify_only, products_error};
use crate::error::Result;
use crate::filters;
use crate::models::{Notification, session_keys};
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub value: String,
}

/// Search results fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate {
    pub products: Vec<Product>,
    pub notifications: Vec<Notification>,
}

/// Search products by name or category (HTMX).
#[instrument(skip(state, session))]
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    let key = search_key(&session).await?;
    let debouncer = state.debouncers().for_session(&key);
    let client = state.qkart();

    let Some(outcome) = debouncer
        .run(|| client.search_products(&query.value))
        .await
    else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let response = match outcome {
        Ok(products) => SearchResultsTemplate {
            products,
            notifications: Vec::new(),
        }
        .into_response(),
        // Nothing matched
        Err(e) if e.is_not_found() => SearchResultsTemplate {
            products: Vec::new(),
            notifications: Vec::new(),
        }
        .into_response(),
        Err(e) if e.is_server_error() => {
            tracing::warn!("Search failed, falling back to catalog: {e}");
            let products = match client.products().await {
                Ok(products) => products,
                Err(e) => {
                    tracing::warn!("Failed to load catalog: {e}");
                    Vec::new()
                }
            };
            SearchResultsTemplate {
                products,
                notifications: vec![products_error(&e)],
            }
            .into_response()
        }
        Err(e) => {
            tracing::warn!("Search failed: {e}");
            notify_only(vec![products_error(&e)])
        }
    };

    Ok(response)
}

/// Key selecting this browser session's debouncer.
///
/// Pages carrying the search box call this too, so the session cookie is
/// set before the first keystroke and a whole burst shares one debouncer.
pub(crate) async fn search_key(
    session: &Session,
) -> std::result::Result<String, tower_sessions::session::Error> {
    if let Some(key) = session.get::<String>(session_keys::SEARCH_KEY).await? {
        return Ok(key);
    }

    let key = Uuid::new_v4().to_string();
    session.insert(session_keys::SEARCH_KEY, &key).await?;
    Ok(key)
}
