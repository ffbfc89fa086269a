//! Session-related types.
//!
//! Types stored in the session for authentication and UI state.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::qkart::LoginResponse;

/// The logged-in user's session.
///
/// Three independent strings, exactly as the login response returned them.
/// Created on login, destroyed on logout; there is no expiry or refresh.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// Bearer token for authenticated API calls.
    #[serde(with = "secret_string")]
    token: SecretString,
    /// Username the user logged in as.
    pub username: String,
    /// Wallet balance as text.
    pub balance: String,
}

impl SessionContext {
    /// Create a new session context.
    #[must_use]
    pub fn new(token: impl Into<String>, username: impl Into<String>, balance: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            username: username.into(),
            balance: balance.into(),
        }
    }

    /// The bearer token.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }
}

impl From<LoginResponse> for SessionContext {
    fn from(response: LoginResponse) -> Self {
        Self::new(response.token, response.username, response.balance)
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("token", &"[REDACTED]")
            .field("username", &self.username)
            .field("balance", &self.balance)
            .finish()
    }
}

/// Serde adapter storing a `SecretString` as a plain string in the session store.
mod secret_string {
    use super::{Deserialize, Deserializer, ExposeSecret, SecretString, Serializer};

    pub fn serialize<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(secret.expose_secret())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
        String::deserialize(deserializer).map(SecretString::from)
    }
}

/// Session keys.
pub mod keys {
    /// Key for the logged-in user's session context.
    pub const SESSION_CONTEXT: &str = "session_context";

    /// Key for the last cart entries returned by the API.
    pub const CART: &str = "cart";

    /// Key for notifications waiting to be shown.
    pub const NOTIFICATIONS: &str = "notifications";

    /// Key for the random ID that selects this browser's search debouncer.
    pub const SEARCH_KEY: &str = "search_key";
}
