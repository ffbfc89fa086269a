//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::debounce::SearchDebouncers;
use crate::qkart::{ApiError, QKartClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the QKart client, the search debouncers and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    qkart: QKartClient,
    debouncers: SearchDebouncers,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let qkart = QKartClient::new(&config.qkart)?;
        let debouncers = SearchDebouncers::new(config.qkart.search_debounce);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                qkart,
                debouncers,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the QKart API client.
    #[must_use]
    pub fn qkart(&self) -> &QKartClient {
        &self.inner.qkart
    }

    /// Get the per-session search debouncers.
    #[must_use]
    pub fn debouncers(&self) -> &SearchDebouncers {
        &self.inner.debouncers
    }
}
