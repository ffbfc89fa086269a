//! QKart commerce API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`, JSON bodies, bearer token for `/cart`
//! - The API is the source of truth for products, carts and accounts
//! - The product catalog is cached in-memory via `moka` (5 minute TTL)
//!
//! # Endpoints
//!
//! ```text
//! POST /auth/login              -> {success, token, username, balance}
//! POST /auth/register           -> {success}
//! GET  /products                -> [Product]
//! GET  /products/search?value=  -> [Product] (404 when nothing matches)
//! GET  /cart                    -> [CartEntry]
//! POST /cart {productId, qty}   -> [CartEntry]
//! ```
//!
//! Failed calls return `{success: false, message}`; the message is shown to
//! the user verbatim for 4xx responses.

mod client;
pub mod types;

pub use client::QKartClient;
pub use types::*;

use thiserror::Error;

/// Generic message for failed login/registration calls.
pub const CONNECTIVITY_MESSAGE: &str = "Something went wrong. Check that the backend is running, reachable and returns valid JSON.";

/// Generic message for a failed catalog or search call.
pub const PRODUCTS_UNAVAILABLE_MESSAGE: &str = "Could not fetch products. Check that the backend is running, reachable and returns valid JSON.";

/// Generic message for a failed cart read or write.
pub const CART_UNAVAILABLE_MESSAGE: &str = "Could not fetch cart details. Check that the backend is running, reachable and returns valid JSON.";

/// Errors that can occur when interacting with the QKart API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the request with a 4xx status and a message.
    #[error("API rejected request: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// Any other non-success status (5xx, or 4xx without a message).
    #[error("API error: {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// The API answered 2xx but reported `"success": false`.
    #[error("API reported failure: {}", message.as_deref().unwrap_or("no message"))]
    Declined { message: Option<String> },

    /// Response body was not the JSON we expected.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status returned by the API, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Http(_) | Self::Declined { .. } | Self::Parse(_) => None,
        }
    }

    /// Whether the API answered `404 Not Found`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }

    /// Whether the API answered with a 5xx status.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(500..=599))
    }

    /// Message supplied by the API in the error body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            Self::Status { message, .. } | Self::Declined { message } => message.as_deref(),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }

    /// Text to show the user.
    ///
    /// Client errors carrying a message are shown verbatim; everything else
    /// (network failures, 5xx, unparseable bodies) becomes `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected { message, .. }
            | Self::Declined {
                message: Some(message),
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}
