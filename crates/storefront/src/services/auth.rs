//! Login and registration.
//!
//! Forms are validated locally first; an invalid form never reaches the API.

use qkart_core::{LoginForm, RegisterForm, ValidationError};
use thiserror::Error;
use tracing::instrument;

use crate::models::{Notification, SessionContext};
use crate::qkart::{ApiError, CONNECTIVITY_MESSAGE, QKartClient};

/// Shown after a successful login.
pub const LOGGED_IN_MESSAGE: &str = "Logged in";

/// Shown after a successful registration.
pub const REGISTERED_MESSAGE: &str = "Registered successfully";

/// Shown after logout.
pub const LOGGED_OUT_MESSAGE: &str = "Logged out successfully";

/// Errors that can occur during login or registration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The form failed local validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The API call failed or was rejected.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Notification describing the failure.
    ///
    /// Validation problems are warnings; API failures are errors carrying
    /// the server's message for 4xx rejections.
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self {
            Self::Validation(err) => Notification::warning(err.to_string()),
            Self::Api(err) => Notification::error(err.user_message(CONNECTIVITY_MESSAGE)),
        }
    }
}

/// Validate the login form and log in.
///
/// The returned context holds the token, username and balance exactly as the
/// API sent them.
///
/// # Errors
///
/// Returns `AuthError::Validation` before any network call if the form is
/// incomplete, or `AuthError::Api` if the API refuses or fails.
#[instrument(skip(client, form))]
pub async fn login(client: &QKartClient, form: &LoginForm) -> Result<SessionContext, AuthError> {
    let credentials = form.validate()?;
    let response = client.login(&credentials).await?;

    tracing::info!(username = %response.username, "User logged in");
    Ok(SessionContext::from(response))
}

/// Validate the registration form and create the account.
///
/// Does not log the user in.
///
/// # Errors
///
/// Returns `AuthError::Validation` before any network call if the form is
/// invalid, or `AuthError::Api` if the API refuses or fails.
#[instrument(skip(client, form))]
pub async fn register(client: &QKartClient, form: &RegisterForm) -> Result<(), AuthError> {
    let credentials = form.validate()?;
    client.register(&credentials).await?;

    tracing::info!(username = %credentials.username, "User registered");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::QKartConfig;
    use crate::models::Level;

    fn offline_client() -> QKartClient {
        let config = QKartConfig::with_api_url("http://127.0.0.1:9").unwrap();
        QKartClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_short_password_rejected_locally() {
        let form = RegisterForm {
            username: "crio.do".to_string(),
            password: "abc12".to_string(),
            confirm_password: "abc12".to_string(),
        };

        let err = register(&offline_client(), &form).await.unwrap_err();

        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::PasswordTooShort { .. })
        ));
        let notification = err.notification();
        assert_eq!(notification.level, Level::Warning);
        assert!(notification.message.contains("at least 6 characters"));
    }

    #[tokio::test]
    async fn test_empty_login_rejected_locally() {
        let form = LoginForm {
            username: String::new(),
            password: "learnwithcrio".to_string(),
        };

        let err = login(&offline_client(), &form).await.unwrap_err();
        assert_eq!(err.notification().message, "Username is a required field");
    }

    #[tokio::test]
    async fn test_unreachable_api_uses_connectivity_message() {
        let form = LoginForm {
            username: "crio.do".to_string(),
            password: "learnwithcrio".to_string(),
        };

        let err = login(&offline_client(), &form).await.unwrap_err();
        assert!(matches!(err, AuthError::Api(_)));
        assert_eq!(err.notification().message, CONNECTIVITY_MESSAGE);
    }
}
