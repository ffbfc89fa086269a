//! Catalog page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use qkart_core::Product;
use tower_sessions::Session;
use tracing::instrument;

use super::cart::{CartView, forget_cart, store_cart};
use super::products_error;
use super::search::search_key;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{HeaderView, Notification, SessionContext, notification};
use crate::qkart::CART_UNAVAILABLE_MESSAGE;
use crate::services::cart::load_cart;
use crate::state::AppState;

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/products.html")]
pub struct ProductsTemplate {
    pub header: HeaderView,
    pub notifications: Vec<Notification>,
    pub products: Vec<Product>,
    /// Only present for logged-in users.
    pub cart: Option<CartView>,
}

/// Display the catalog page.
///
/// Loads the product catalog and, for logged-in users, the cart. Either
/// failing degrades to an empty list plus an error notification.
#[instrument(skip(state, session, context))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(context): OptionalAuth,
) -> Result<impl IntoResponse> {
    search_key(&session).await?;
    let mut notifications = notification::take(&session).await;

    let products = match state.qkart().products().await {
        Ok(products) => products,
        Err(e) => {
            tracing::warn!("Failed to load catalog: {e}");
            notifications.push(products_error(&e));
            Vec::new()
        }
    };

    let cart = match &context {
        Some(context) => {
            Some(cart_for(&state, &session, context, &products, &mut notifications).await?)
        }
        None => None,
    };

    Ok(ProductsTemplate {
        header: HeaderView::for_catalog(context.as_ref()),
        notifications,
        products,
        cart,
    })
}

/// Fetch the user's cart and remember it in the session.
async fn cart_for(
    state: &AppState,
    session: &Session,
    context: &SessionContext,
    products: &[Product],
    notifications: &mut Vec<Notification>,
) -> Result<CartView> {
    match load_cart(state.qkart(), context.token(), products).await {
        Ok(items) => {
            store_cart(session, &items).await?;
            Ok(CartView::from_items(&items))
        }
        Err(e) => {
            tracing::warn!("Failed to load cart: {e}");
            // Keep duplicate checks in line with the empty panel
            forget_cart(session).await?;
            notifications.push(Notification::error(
                e.user_message(CART_UNAVAILABLE_MESSAGE),
            ));
            Ok(CartView::from_items(&[]))
        }
    }
}
