//! Integration test harness for the QKart storefront.
//!
//! Nothing here needs external services: [`FakeBackend`] serves the QKart
//! REST API on an ephemeral port and counts every call, and
//! [`spawn_storefront`] runs the real storefront router against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p qkart-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use qkart_core::CartEntry;
use qkart_storefront::config::{QKartConfig, StorefrontConfig};
use qkart_storefront::state::AppState;
use serde::Deserialize;
use serde_json::{Value, json};

/// Username the fake backend accepts.
pub const USERNAME: &str = "crio.do";

/// Password the fake backend accepts.
pub const PASSWORD: &str = "learnwithcrio";

/// Token issued on login.
pub const TOKEN: &str = "testtoken";

/// Username the fake backend treats as already registered.
pub const TAKEN_USERNAME: &str = "taken.user";

/// Username whose registration is acknowledged with `"success": false`.
pub const DECLINED_USERNAME: &str = "paused.user";

/// Message sent with the declined registration.
pub const DECLINED_MESSAGE: &str = "Registrations are paused";

/// Search value that makes the fake backend fail with a 500.
pub const FAILING_SEARCH: &str = "boom";

/// Message sent with the failing search.
pub const SEARCH_FAILURE_MESSAGE: &str = "Search index unavailable";

/// Message sent with a failing catalog call.
pub const CATALOG_FAILURE_MESSAGE: &str = "Catalog service unavailable";

/// Per-endpoint call counters.
#[derive(Debug, Default)]
pub struct Hits {
    pub login: AtomicUsize,
    pub register: AtomicUsize,
    pub products: AtomicUsize,
    pub search: AtomicUsize,
    pub cart_reads: AtomicUsize,
    pub cart_writes: AtomicUsize,
}

impl Hits {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Read a counter.
    #[must_use]
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

struct BackendState {
    products: Vec<Value>,
    cart: Mutex<Vec<CartEntry>>,
    searches: Mutex<Vec<String>>,
    hits: Hits,
    fail_catalog: AtomicBool,
    fail_cart_reads: AtomicBool,
}

/// In-process stand-in for the QKart REST API.
pub struct FakeBackend {
    /// API base URL, e.g. `http://127.0.0.1:12345/api/v1`.
    pub api_url: String,
    state: Arc<BackendState>,
}

impl FakeBackend {
    /// Start the backend on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(BackendState {
            products: sample_products(),
            cart: Mutex::new(Vec::new()),
            searches: Mutex::new(Vec::new()),
            hits: Hits::default(),
            fail_catalog: AtomicBool::new(false),
            fail_cart_reads: AtomicBool::new(false),
        });

        let api = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/products", get(products))
            .route("/products/search", get(search))
            .route("/cart", get(read_cart).post(write_cart))
            .with_state(Arc::clone(&state));

        let addr = serve(Router::new().nest("/api/v1", api)).await;

        Self {
            api_url: format!("http://{addr}/api/v1"),
            state,
        }
    }

    /// Call counters.
    #[must_use]
    pub fn hits(&self) -> &Hits {
        &self.state.hits
    }

    /// Make `GET /products` answer 500 with [`CATALOG_FAILURE_MESSAGE`].
    ///
    /// The storefront caches the catalog, so set this before the first page load.
    pub fn fail_catalog(&self, fail: bool) {
        self.state.fail_catalog.store(fail, Ordering::SeqCst);
    }

    /// Make `GET /cart` answer 500 without a message.
    pub fn fail_cart_reads(&self, fail: bool) {
        self.state.fail_cart_reads.store(fail, Ordering::SeqCst);
    }

    /// Every search value received, in order.
    #[must_use]
    pub fn searches(&self) -> Vec<String> {
        self.state
            .searches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The cart as the backend stores it.
    #[must_use]
    pub fn cart(&self) -> Vec<CartEntry> {
        self.state
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// ID of the `index`-th sample product.
    #[must_use]
    pub fn product_id(&self, index: usize) -> String {
        self.state
            .products
            .get(index)
            .and_then(|p| p["_id"].as_str())
            .expect("sample product exists")
            .to_string()
    }
}

/// Run the storefront against `api_url` and return its base URL.
pub async fn spawn_storefront(api_url: &str, search_debounce: Duration) -> String {
    let mut qkart = QKartConfig::with_api_url(api_url).expect("valid API URL");
    qkart.search_debounce = search_debounce;

    let config = StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid host"),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        qkart,
        sentry_dsn: None,
        sentry_environment: None,
    };
    let state = AppState::new(config).expect("state builds");

    let addr = serve(qkart_storefront::app(state)).await;
    format!("http://{addr}")
}

/// A browser: keeps cookies, does not follow redirects.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });

    addr
}

fn sample_products() -> Vec<Value> {
    json!([
        {
            "_id": "BW0jAAeDJmlZCF8i",
            "name": "Tan Leatherette Weekender Duffle",
            "category": "Fashion",
            "cost": 150,
            "rating": 4,
            "image": "https://crio-directus-assets.s3.ap-south-1.amazonaws.com/ff071a1c-1099-48f9-9b03-f858ccc53832.png"
        },
        {
            "_id": "KCRwjF7lN97HnEaY",
            "name": "Apple iPhone XR",
            "category": "Phones",
            "cost": 400,
            "rating": 5,
            "image": "https://crio-directus-assets.s3.ap-south-1.amazonaws.com/5d2ad8d2-3a9f-4f49-8ac1-f2ac5e2e2b48.png"
        },
        {
            "_id": "upLK9JbQ4rMhTwt4",
            "name": "Basketball",
            "category": "Sports",
            "cost": 100,
            "rating": 5,
            "image": "https://i.imgur.com/lulqWzW.jpg"
        }
    ])
    .as_array()
    .cloned()
    .unwrap_or_default()
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

#[derive(Deserialize)]
struct CredentialsBody {
    username: String,
    password: String,
}

async fn login(State(state): State<Arc<BackendState>>, Json(body): Json<CredentialsBody>) -> Response {
    Hits::bump(&state.hits.login);

    if body.username != USERNAME {
        return failure(StatusCode::BAD_REQUEST, "Username does not exist");
    }
    if body.password != PASSWORD {
        return failure(StatusCode::BAD_REQUEST, "Password is incorrect");
    }

    Json(json!({
        "success": true,
        "token": TOKEN,
        "username": USERNAME,
        "balance": 5000
    }))
    .into_response()
}

async fn register(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<CredentialsBody>,
) -> Response {
    Hits::bump(&state.hits.register);

    if body.username == TAKEN_USERNAME {
        return failure(StatusCode::BAD_REQUEST, "Username is already taken");
    }
    if body.username == DECLINED_USERNAME {
        return failure(StatusCode::OK, DECLINED_MESSAGE);
    }

    (StatusCode::CREATED, Json(json!({ "success": true }))).into_response()
}

async fn products(State(state): State<Arc<BackendState>>) -> Response {
    Hits::bump(&state.hits.products);

    if state.fail_catalog.load(Ordering::SeqCst) {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, CATALOG_FAILURE_MESSAGE);
    }

    Json(state.products.clone()).into_response()
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    value: String,
}

async fn search(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    Hits::bump(&state.hits.search);
    state
        .searches
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(params.value.clone());

    if params.value == FAILING_SEARCH {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, SEARCH_FAILURE_MESSAGE);
    }

    let needle = params.value.to_lowercase();
    let matches: Vec<Value> = state
        .products
        .iter()
        .filter(|p| {
            ["name", "category"].iter().any(|field| {
                p[*field]
                    .as_str()
                    .is_some_and(|v| v.to_lowercase().contains(&needle))
            })
        })
        .cloned()
        .collect();

    if matches.is_empty() {
        return StatusCode::NOT_FOUND.into_response();
    }

    Json(matches).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn read_cart(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    Hits::bump(&state.hits.cart_reads);

    if !authorized(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Protected route, Oauth2 Bearer token not found");
    }

    if state.fail_cart_reads.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let cart = state.cart.lock().unwrap_or_else(PoisonError::into_inner).clone();
    Json(cart).into_response()
}

async fn write_cart(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(entry): Json<CartEntry>,
) -> Response {
    Hits::bump(&state.hits.cart_writes);

    if !authorized(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Protected route, Oauth2 Bearer token not found");
    }

    let mut cart = state.cart.lock().unwrap_or_else(PoisonError::into_inner);
    let position = cart.iter().position(|e| e.product_id == entry.product_id);
    match (position, entry.qty) {
        (Some(index), 0) => {
            cart.remove(index);
        }
        (Some(index), _) => {
            if let Some(existing) = cart.get_mut(index) {
                existing.qty = entry.qty;
            }
        }
        (None, 0) => {}
        (None, _) => cart.push(entry),
    }

    Json(cart.clone()).into_response()
}
