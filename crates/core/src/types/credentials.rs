//! Login and registration forms with local validation.
//!
//! Forms are checked before anything is sent to the commerce API. A form
//! that fails validation never produces [`Credentials`], so no request can
//! be made with it.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Minimum length of a username at registration.
pub const MIN_USERNAME_LENGTH: usize = 6;

/// Minimum length of a password at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Errors that can occur when validating a login or registration form.
///
/// The `Display` text is shown to the user as-is.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The username field is empty.
    #[error("Username is a required field")]
    UsernameRequired,
    /// The username is shorter than the minimum.
    #[error("Username must be at least {min} characters")]
    UsernameTooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The password field is empty.
    #[error("Password is a required field")]
    PasswordRequired,
    /// The password is shorter than the minimum.
    #[error("Password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Username and password as sent to `POST /auth/login` and `POST /auth/register`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Login form data.
#[derive(Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl LoginForm {
    /// Check that both fields are filled in.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule: username required, then password required.
    pub fn validate(&self) -> Result<Credentials, ValidationError> {
        if self.username.is_empty() {
            return Err(ValidationError::UsernameRequired);
        }
        if self.password.is_empty() {
            return Err(ValidationError::PasswordRequired);
        }

        Ok(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

/// Registration form data.
#[derive(Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

impl RegisterForm {
    /// Check the registration rules in order.
    ///
    /// The confirmation field is only used here; the returned credentials
    /// carry the username and password alone.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule:
    /// - username empty or shorter than [`MIN_USERNAME_LENGTH`]
    /// - password empty or shorter than [`MIN_PASSWORD_LENGTH`]
    /// - confirmation differs from password
    pub fn validate(&self) -> Result<Credentials, ValidationError> {
        if self.username.is_empty() {
            return Err(ValidationError::UsernameRequired);
        }
        if self.username.chars().count() < MIN_USERNAME_LENGTH {
            return Err(ValidationError::UsernameTooShort {
                min: MIN_USERNAME_LENGTH,
            });
        }
        if self.password.is_empty() {
            return Err(ValidationError::PasswordRequired);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}
