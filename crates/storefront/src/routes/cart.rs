//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The API owns the cart; the session keeps the last entries it returned so
//! duplicate checks need no round trip.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use qkart_core::{
    CartEntry, CartItem, ProductId, generate_cart_items_from, item_count, total_cost,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{notify_only, products_error};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::OptionalAuth;
use crate::models::{SessionContext, session_keys};
use crate::services::cart::{AddToCartOptions, CartError, add_to_cart};
use crate::state::AppState;

/// One cart line for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub image_url: String,
    pub cost: String,
    pub qty: u32,
    /// Quantity after pressing "-" (0 removes the line).
    pub fewer: u32,
    /// Quantity after pressing "+".
    pub more: u32,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.to_string(),
            name: item.product.name.clone(),
            image_url: item.product.image_url.clone(),
            cost: item.product.cost.display(),
            qty: item.qty,
            fewer: item.qty.saturating_sub(1),
            more: item.qty.saturating_add(1),
        }
    }
}

/// Cart panel display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// Build the panel from reconciled cart items.
    #[must_use]
    pub fn from_items(items: &[CartItem]) -> Self {
        Self {
            lines: items.iter().map(CartLineView::from).collect(),
            total: total_cost(items).display(),
            item_count: item_count(items),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the last cart entries returned by the API.
async fn stored_cart(session: &Session) -> Vec<CartEntry> {
    match session.get::<Vec<CartEntry>>(session_keys::CART).await {
        Ok(entries) => entries.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to read cart from session: {e}");
            Vec::new()
        }
    }
}

/// Remember the cart in the session.
pub(crate) async fn store_cart(
    session: &Session,
    items: &[CartItem],
) -> std::result::Result<(), tower_sessions::session::Error> {
    let entries: Vec<CartEntry> = items.iter().map(CartItem::to_entry).collect();
    session.insert(session_keys::CART, entries).await
}

/// Drop the remembered cart, e.g. after the API failed to return one.
pub(crate) async fn forget_cart(
    session: &Session,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.remove::<Vec<CartEntry>>(session_keys::CART).await?;
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub qty: u32,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
}

/// Add a product from its card (HTMX).
///
/// Rejected for guests and for products already in the cart.
#[instrument(skip(state, session, context))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(context): OptionalAuth,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    write_cart(
        &state,
        &session,
        context.as_ref(),
        form.product_id,
        1,
        AddToCartOptions::from_product_card(),
    )
    .await
}

/// Set a product's quantity from the cart panel (HTMX).
#[instrument(skip(state, session, context))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(context): OptionalAuth,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    write_cart(
        &state,
        &session,
        context.as_ref(),
        form.product_id,
        form.qty,
        AddToCartOptions::from_cart_panel(),
    )
    .await
}

async fn write_cart(
    state: &AppState,
    session: &Session,
    context: Option<&SessionContext>,
    product_id: String,
    qty: u32,
    options: AddToCartOptions,
) -> Result<Response> {
    if product_id.is_empty() {
        return Err(AppError::BadRequest("missing product_id".to_string()));
    }
    let product_id = ProductId::new(product_id);
    let token = context.map(SessionContext::token);

    // Guests are rejected before anything touches the network
    let catalog = if token.is_some() {
        match state.qkart().products().await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!("Failed to load catalog for cart: {e}");
                return Ok(notify_only(vec![products_error(&e)]));
            }
        }
    } else {
        Vec::new()
    };
    let items = generate_cart_items_from(&stored_cart(session).await, &catalog);

    match add_to_cart(
        state.qkart(),
        token,
        &items,
        &product_id,
        &catalog,
        qty,
        options,
    )
    .await
    {
        Ok(items) => {
            store_cart(session, &items).await?;
            add_breadcrumb(
                "cart",
                "Cart updated",
                Some(&[("product_id", product_id.as_str())]),
            );

            Ok(CartPanelTemplate {
                cart: CartView::from_items(&items),
            }
            .into_response())
        }
        Err(e) => {
            if let CartError::Api(api) = &e {
                tracing::warn!("Failed to update cart: {api}");
            }
            Ok(notify_only(vec![e.notification()]))
        }
    }
}
