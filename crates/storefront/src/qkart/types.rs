//! Request and response bodies specific to the QKart REST API.
//!
//! Catalog and cart payloads live in `qkart_core`; this module only holds
//! the auth envelopes and the error body.

use core::fmt;

use serde::{Deserialize, Deserializer};

/// Successful `POST /auth/login` response.
///
/// ```json
/// { "success": true, "token": "testtoken", "username": "criodo", "balance": 5000 }
/// ```
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    /// Wallet balance, kept as the exact text the API sent.
    #[serde(deserialize_with = "string_or_number")]
    pub balance: String,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("username", &self.username)
            .field("balance", &self.balance)
            .finish()
    }
}

/// Body of a write that carries no data (`POST /auth/register`).
///
/// A missing `success` field counts as success; only an explicit `false`
/// is a failure.
#[derive(Debug, Clone, Deserialize)]
pub struct Acknowledgement {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

const fn default_success() -> bool {
    true
}

/// Body of a failed call: `{ "success": false, "message": "..." }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Accept a JSON number or string and keep its textual form.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a number or string, got {other}"
        ))),
    }
}
