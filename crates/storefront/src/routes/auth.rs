//! Authentication route handlers.
//!
//! Handles login, registration and logout against the QKart API. Forms are
//! plain POSTs; failures re-render the form with a notification.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use qkart_core::{LoginForm, RegisterForm};
use tower_sessions::Session;
use tracing::instrument;

use super::search::search_key;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_session_context, set_session_context};
use crate::models::{HeaderView, Notification, notification};
use crate::services::auth::{self as auth_service, LOGGED_IN_MESSAGE, LOGGED_OUT_MESSAGE, REGISTERED_MESSAGE};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub header: HeaderView,
    pub notifications: Vec<Notification>,
    /// Previously entered username, kept after a failed attempt.
    pub username: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub header: HeaderView,
    pub notifications: Vec<Notification>,
    pub username: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(session: Session) -> Result<impl IntoResponse> {
    search_key(&session).await?;
    Ok(LoginTemplate {
        header: HeaderView::AuthPage,
        notifications: notification::take(&session).await,
        username: String::new(),
    })
}

/// Handle login form submission.
///
/// On success the token, username and balance go into the session and the
/// user lands on the catalog.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match auth_service::login(state.qkart(), &form).await {
        Ok(context) => {
            set_session_context(&session, &context).await?;
            set_sentry_user(&context.username);
            notification::push(&session, Notification::success(LOGGED_IN_MESSAGE)).await?;

            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::info!("Login failed: {e}");
            Ok(LoginTemplate {
                header: HeaderView::AuthPage,
                notifications: vec![e.notification()],
                username: form.username,
            }
            .into_response())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(session: Session) -> Result<impl IntoResponse> {
    search_key(&session).await?;
    Ok(RegisterTemplate {
        header: HeaderView::AuthPage,
        notifications: notification::take(&session).await,
        username: String::new(),
    })
}

/// Handle registration form submission.
///
/// Registration does not log the user in; success leads to the login page.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    match auth_service::register(state.qkart(), &form).await {
        Ok(()) => {
            notification::push(&session, Notification::success(REGISTERED_MESSAGE)).await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => {
            tracing::info!("Registration failed: {e}");
            Ok(RegisterTemplate {
                header: HeaderView::AuthPage,
                notifications: vec![e.notification()],
                username: form.username,
            }
            .into_response())
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
///
/// Tears down the whole session, including the cached cart.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    clear_session_context(&session).await?;
    clear_sentry_user();
    notification::push(&session, Notification::success(LOGGED_OUT_MESSAGE)).await?;

    Ok(Redirect::to("/").into_response())
}
