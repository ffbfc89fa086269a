//! End-to-end storefront flows against the fake backend.
//!
//! Each test starts its own backend and storefront and drives them with a
//! cookie-keeping client, the way a browser would.

use std::time::Duration;

use qkart_integration_tests::{
    CATALOG_FAILURE_MESSAGE, DECLINED_MESSAGE, DECLINED_USERNAME, FAILING_SEARCH, FakeBackend,
    Hits, PASSWORD, SEARCH_FAILURE_MESSAGE, TAKEN_USERNAME, USERNAME, browser, spawn_storefront,
};
use qkart_storefront::qkart::CART_UNAVAILABLE_MESSAGE;
use reqwest::{Client, StatusCode, header};

const DEBOUNCE: Duration = Duration::from_millis(500);

struct Harness {
    backend: FakeBackend,
    base_url: String,
    client: Client,
}

impl Harness {
    async fn start() -> Self {
        let backend = FakeBackend::start().await;
        let base_url = spawn_storefront(&backend.api_url, DEBOUNCE).await;

        Self {
            backend,
            base_url,
            client: browser(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("request succeeds")
    }

    async fn post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("request succeeds")
    }

    async fn login(&self) -> reqwest::Response {
        self.post("/login", &[("username", USERNAME), ("password", PASSWORD)])
            .await
    }
}

fn location(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

async fn text(response: reqwest::Response) -> String {
    response.text().await.expect("body is text")
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_login_persists_session_and_redirects_to_catalog() {
    let harness = Harness::start().await;

    let response = harness.login().await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let page = text(harness.get("/").await).await;
    assert!(page.contains("Logged in"));
    assert!(page.contains(USERNAME));
    assert!(page.contains("Wallet: 5000"));
    assert!(page.contains("Logout"));
    assert_eq!(Hits::get(&harness.backend.hits().cart_reads), 1);
}

#[tokio::test]
async fn test_wrong_password_shows_server_message() {
    let harness = Harness::start().await;

    let response = harness
        .post("/login", &[("username", USERNAME), ("password", "wrongpass")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("Password is incorrect"));
}

#[tokio::test]
async fn test_register_validation_makes_no_network_call() {
    let harness = Harness::start().await;

    let response = harness
        .post(
            "/register",
            &[
                ("username", "crio.user"),
                ("password", "abc12"),
                ("confirm_password", "abc12"),
            ],
        )
        .await;

    assert!(text(response).await.contains("at least 6 characters"));
    assert_eq!(Hits::get(&harness.backend.hits().register), 0);
}

#[tokio::test]
async fn test_register_success_leads_to_login() {
    let harness = Harness::start().await;

    let response = harness
        .post(
            "/register",
            &[
                ("username", "crio.user"),
                ("password", "learnwithcrio"),
                ("confirm_password", "learnwithcrio"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));

    let page = text(harness.get("/login").await).await;
    assert!(page.contains("Registered successfully"));
}

#[tokio::test]
async fn test_register_taken_username_shows_server_message() {
    let harness = Harness::start().await;

    let response = harness
        .post(
            "/register",
            &[
                ("username", TAKEN_USERNAME),
                ("password", "learnwithcrio"),
                ("confirm_password", "learnwithcrio"),
            ],
        )
        .await;

    assert!(text(response).await.contains("Username is already taken"));
    assert_eq!(Hits::get(&harness.backend.hits().register), 1);
}

#[tokio::test]
async fn test_register_declined_in_body_is_not_success() {
    let harness = Harness::start().await;

    let response = harness
        .post(
            "/register",
            &[
                ("username", DECLINED_USERNAME),
                ("password", "learnwithcrio"),
                ("confirm_password", "learnwithcrio"),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(location(&response).is_none());
    let page = text(response).await;
    assert!(page.contains(DECLINED_MESSAGE));
    assert!(!page.contains("Registered successfully"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let harness = Harness::start().await;
    harness.login().await;

    let response = harness.post("/logout", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let page = text(harness.get("/").await).await;
    assert!(page.contains("Logged out successfully"));
    assert!(page.contains("href=\"/login\""));
    assert!(!page.contains("Wallet:"));
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_guest_cannot_add_to_cart() {
    let harness = Harness::start().await;
    let product_id = harness.backend.product_id(0);

    let response = harness
        .post("/cart/add", &[("product_id", product_id.as_str())])
        .await;

    assert!(text(response).await.contains("Please log in to add item to cart"));
    assert_eq!(Hits::get(&harness.backend.hits().cart_writes), 0);
}

#[tokio::test]
async fn test_duplicate_add_makes_no_cart_write() {
    let harness = Harness::start().await;
    harness.login().await;
    harness.get("/").await;
    let product_id = harness.backend.product_id(0);

    let response = harness
        .post("/cart/add", &[("product_id", product_id.as_str())])
        .await;
    let panel = text(response).await;
    assert!(panel.contains("Tan Leatherette Weekender Duffle"));
    assert!(panel.contains("$150"));
    assert_eq!(Hits::get(&harness.backend.hits().cart_writes), 1);

    let response = harness
        .post("/cart/add", &[("product_id", product_id.as_str())])
        .await;
    assert_eq!(
        response.headers().get("HX-Reswap").and_then(|v| v.to_str().ok()),
        Some("none")
    );
    assert!(text(response).await.contains("Item already in cart"));
    assert_eq!(Hits::get(&harness.backend.hits().cart_writes), 1);
}

#[tokio::test]
async fn test_cart_panel_updates_quantity() {
    let harness = Harness::start().await;
    harness.login().await;
    let product_id = harness.backend.product_id(2);

    harness
        .post("/cart/add", &[("product_id", product_id.as_str())])
        .await;
    let response = harness
        .post("/cart/update", &[("product_id", product_id.as_str()), ("qty", "3")])
        .await;

    let panel = text(response).await;
    assert!(panel.contains("$300"));
    assert_eq!(harness.backend.cart().first().map(|e| e.qty), Some(3));

    let response = harness
        .post("/cart/update", &[("product_id", product_id.as_str()), ("qty", "0")])
        .await;
    assert!(text(response).await.contains("Cart is empty"));
    assert!(harness.backend.cart().is_empty());
}

#[tokio::test]
async fn test_failed_cart_load_shows_empty_cart_and_forgets_entries() {
    let harness = Harness::start().await;
    harness.login().await;
    let product_id = harness.backend.product_id(0);

    harness
        .post("/cart/add", &[("product_id", product_id.as_str())])
        .await;
    assert_eq!(Hits::get(&harness.backend.hits().cart_writes), 1);

    harness.backend.fail_cart_reads(true);
    let page = text(harness.get("/").await).await;
    assert!(page.contains(CART_UNAVAILABLE_MESSAGE));
    assert!(page.contains("Cart is empty"));
    assert!(page.contains("Basketball"));

    // The panel showed an empty cart, so adding again is not a duplicate
    harness.backend.fail_cart_reads(false);
    let response = harness
        .post("/cart/add", &[("product_id", product_id.as_str())])
        .await;
    let panel = text(response).await;
    assert!(!panel.contains("Item already in cart"));
    assert!(panel.contains("Tan Leatherette Weekender Duffle"));
    assert_eq!(Hits::get(&harness.backend.hits().cart_writes), 2);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_catalog_server_error_shows_server_message() {
    let harness = Harness::start().await;
    harness.backend.fail_catalog(true);

    let response = harness.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = text(response).await;
    assert!(page.contains(CATALOG_FAILURE_MESSAGE));
    assert!(!page.contains("Basketball"));
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_burst_sends_only_last_value() {
    let harness = Harness::start().await;

    // The page load alone must give the burst a shared session
    let response = harness.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::SET_COOKIE));

    let start = tokio::time::Instant::now();
    let mut handles = Vec::new();
    for (offset_ms, value) in [(0, "i"), (100, "ip"), (200, "iph")] {
        let client = harness.client.clone();
        let url = harness.url(&format!("/products/search?value={value}"));
        handles.push(tokio::spawn(async move {
            tokio::time::sleep_until(start + Duration::from_millis(offset_ms)).await;
            let response = client.get(url).send().await.expect("request succeeds");
            let status = response.status();
            (status, response.text().await.expect("body is text"))
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.expect("task completes"));
    }

    let statuses: Vec<StatusCode> = results.iter().map(|(status, _)| *status).collect();
    assert_eq!(
        statuses,
        vec![StatusCode::NO_CONTENT, StatusCode::NO_CONTENT, StatusCode::OK]
    );
    assert!(results.last().is_some_and(|(_, body)| body.contains("Apple iPhone XR")));
    assert_eq!(harness.backend.searches(), vec!["iph".to_string()]);
}

#[tokio::test]
async fn test_search_without_matches_shows_empty_grid() {
    let harness = Harness::start().await;

    let body = text(harness.get("/products/search?value=zzzz").await).await;
    assert!(body.contains("No products found"));
}

#[tokio::test]
async fn test_search_server_error_falls_back_to_catalog() {
    let harness = Harness::start().await;

    let body = text(
        harness
            .get(&format!("/products/search?value={FAILING_SEARCH}"))
            .await,
    )
    .await;

    assert!(body.contains(SEARCH_FAILURE_MESSAGE));
    assert!(body.contains("Basketball"));
    assert!(body.contains("Apple iPhone XR"));
}
