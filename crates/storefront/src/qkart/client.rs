//! QKart API client implementation.
//!
//! Uses `reqwest` for HTTP and caches the product catalog with `moka`.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use qkart_core::{CartEntry, Credentials, Product, ProductId};
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::types::{Acknowledgement, ErrorBody, LoginResponse};
use super::ApiError;
use crate::config::QKartConfig;

/// How long the product catalog is served from memory.
const CATALOG_TTL: Duration = Duration::from_secs(300);

/// Cache key for API responses.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    Catalog,
}

/// Client for the QKart commerce API.
///
/// Cheap to clone; all clones share one connection pool and one catalog cache.
#[derive(Clone)]
pub struct QKartClient {
    inner: Arc<QKartClientInner>,
}

struct QKartClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, Arc<Vec<Product>>>,
}

impl QKartClient {
    /// Create a new QKart API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &QKartConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(CATALOG_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(QKartClientInner {
                client,
                base_url: config.api_url.clone(),
                cache,
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Send a request and decode a JSON body.
    ///
    /// Non-success statuses become `ApiError::Rejected` (4xx with a message)
    /// or `ApiError::Status`; bodies that do not match `T` become
    /// `ApiError::Parse`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);

            tracing::warn!(
                status = %status,
                message = message.as_deref().unwrap_or(""),
                "QKart API returned non-success status"
            );

            return Err(match message {
                Some(message) if status.is_client_error() => ApiError::Rejected {
                    status: status.as_u16(),
                    message,
                },
                message => ApiError::Status {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse QKart API response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in with a username and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` for wrong credentials, or another
    /// variant if the API is unreachable or misbehaves.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("/auth/login"))
            .json(credentials);

        self.send(request).await
    }

    /// Register a new account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if the username is taken,
    /// `ApiError::Declined` for a 2xx body with `"success": false`, or
    /// another variant if the API is unreachable or misbehaves.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("/auth/register"))
            .json(credentials);

        let ack: Acknowledgement = self.send(request).await?;
        if !ack.success {
            tracing::warn!("QKart API acknowledged registration with success=false");
            return Err(ApiError::Declined {
                message: ack.message,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Get the full product catalog.
    ///
    /// Served from cache for five minutes after a successful fetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(products) = self.inner.cache.get(&CacheKey::Catalog).await {
            debug!("Cache hit for catalog");
            return Ok(products.as_ref().clone());
        }

        let request = self.inner.client.get(self.url("/products"));
        let products: Vec<Product> = self.send(request).await?;

        self.inner
            .cache
            .insert(CacheKey::Catalog, Arc::new(products.clone()))
            .await;

        Ok(products)
    }

    /// Search products by name or category.
    ///
    /// Never cached. The API answers 404 when nothing matches; callers
    /// decide what that means for the UI.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, value: &str) -> Result<Vec<Product>, ApiError> {
        let url = format!(
            "{}?value={}",
            self.url("/products/search"),
            urlencoding::encode(value)
        );

        self.send(self.inner.client.get(url)).await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Get the logged-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn cart(&self, token: &SecretString) -> Result<Vec<CartEntry>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url("/cart"))
            .bearer_auth(token.expose_secret());

        self.send(request).await
    }

    /// Set the quantity of a product in the cart.
    ///
    /// Returns the full cart as stored by the API after the write.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the token is rejected.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn update_cart(
        &self,
        token: &SecretString,
        product_id: &ProductId,
        qty: u32,
    ) -> Result<Vec<CartEntry>, ApiError> {
        let body = CartEntry::new(product_id.clone(), qty);
        let request = self
            .inner
            .client
            .post(self.url("/cart"))
            .bearer_auth(token.expose_secret())
            .json(&body);

        self.send(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let config = QKartConfig::with_api_url("http://localhost:8082/api/v1/").unwrap();
        let client = QKartClient::new(&config).unwrap();
        assert_eq!(client.url("/cart"), "http://localhost:8082/api/v1/cart");
    }

    #[tokio::test]
    async fn test_unreachable_api_is_http_error() {
        // Port 9 (discard) is not expected to accept HTTP connections
        let config = QKartConfig::with_api_url("http://127.0.0.1:9").unwrap();
        let client = QKartClient::new(&config).unwrap();

        let err = client.products().await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
        assert_eq!(err.status(), None);
    }
}
