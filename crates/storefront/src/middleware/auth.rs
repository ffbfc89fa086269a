//! Session context extractor and lifecycle helpers.
//!
//! The session context is created on login and torn down on logout. Handlers
//! that behave differently for guests and logged-in users take
//! [`OptionalAuth`].

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::models::{SessionContext, session_keys};

/// Extractor that optionally gets the logged-in user's session context.
///
/// Never rejects: guests get `None`.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(context): OptionalAuth,
/// ) -> impl IntoResponse {
///     match context {
///         Some(c) => format!("Hello, {}!", c.username),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<SessionContext>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = match parts.extensions.get::<Session>() {
            Some(session) => current_session(session).await,
            None => None,
        };

        Ok(Self(context))
    }
}

/// Read the session context, treating store failures as "not logged in".
pub async fn current_session(session: &Session) -> Option<SessionContext> {
    match session.get::<SessionContext>(session_keys::SESSION_CONTEXT).await {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!("Failed to read session context: {e}");
            None
        }
    }
}

/// Persist the session context after a successful login.
///
/// The session ID is rotated first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_session_context(
    session: &Session,
    context: &SessionContext,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::SESSION_CONTEXT, context).await
}

/// Tear down the whole session (logout).
///
/// Removes the session context, the cached cart and everything else.
///
/// # Errors
///
/// Returns an error if the session cannot be flushed.
pub async fn clear_session_context(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use secrecy::ExposeSecret;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_set_then_read_session_context() {
        let session = session();
        assert!(current_session(&session).await.is_none());

        set_session_context(&session, &SessionContext::new("testtoken", "criodo", "5000"))
            .await
            .unwrap();

        let context = current_session(&session).await.unwrap();
        assert_eq!(context.token().expose_secret(), "testtoken");
        assert_eq!(context.username, "criodo");
        assert_eq!(context.balance, "5000");
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let session = session();
        set_session_context(&session, &SessionContext::new("t", "u", "1"))
            .await
            .unwrap();
        session.insert(session_keys::CART, Vec::<u32>::new()).await.unwrap();

        clear_session_context(&session).await.unwrap();

        assert!(current_session(&session).await.is_none());
        assert!(session.is_empty().await);
    }
}
