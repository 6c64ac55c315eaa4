use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use stockflow_api::app::{build_app, AppConfig};
use stockflow_infra::InMemoryBackend;

const ADMIN_EMAIL: &str = "admin@stockflow.test";
const ADMIN_PASSWORD: &str = "correct horse";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory backend, ephemeral port.
        let app = build_app(
            AppConfig {
                jwt_secret: "test-secret".to_string(),
                admin_email: ADMIN_EMAIL.to_string(),
                admin_password: ADMIN_PASSWORD.to_string(),
            },
            Arc::new(InMemoryBackend::new()),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn sign_in(client: &reqwest::Client, base_url: &str) -> String {
    let res = client
        .post(format!("{}/auth/sign_in", base_url))
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

async fn create_product(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
    price_cents: u64,
    stock: i64,
) -> String {
    let res = client
        .post(format!("{}/admin/products", base_url))
        .bearer_auth(token)
        .json(&json!({ "name": name, "price_cents": price_cents, "stock": stock }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn admin_routes_require_a_bearer_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/admin/products", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/admin/products", srv.base_url))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sign_in_rejects_bad_credentials_and_issues_working_tokens() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/sign_in", srv.base_url))
        .json(&json!({ "email": ADMIN_EMAIL, "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Email match is case-insensitive.
    let res = client
        .post(format!("{}/auth/sign_in", srv.base_url))
        .json(&json!({ "email": "ADMIN@stockflow.test", "password": ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap();

    let res = client
        .get(format!("{}/admin/session", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["email"].as_str().unwrap(), ADMIN_EMAIL);
}

#[tokio::test]
async fn product_crud_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = sign_in(&client, &srv.base_url).await;

    let id = create_product(&client, &srv.base_url, &token, "Widget", 1999, 25).await;

    // Update price and stock, leave the name alone.
    let res = client
        .put(format!("{}/admin/products/{}", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "price_cents": 2499, "stock": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"].as_str().unwrap(), "Widget");
    assert_eq!(body["price_cents"].as_u64().unwrap(), 2499);
    assert_eq!(body["stock"].as_i64().unwrap(), 3);
    assert_eq!(body["stock_status"].as_str().unwrap(), "low-stock");
    assert_eq!(body["max_purchasable"].as_i64().unwrap(), 3);

    // Blank name is rejected.
    let res = client
        .put(format!("{}/admin/products/{}", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .delete(format!("{}/admin/products/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // Deleting again is a miss.
    let res = client
        .delete(format!("{}/admin/products/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn storefront_hides_out_of_stock_products() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = sign_in(&client, &srv.base_url).await;

    create_product(&client, &srv.base_url, &token, "gone", 500, 0).await;
    create_product(&client, &srv.base_url, &token, "here", 500, 4).await;

    let res = client
        .get(format!("{}/store/products", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"].as_str().unwrap(), "here");

    // Admin listing still shows both.
    let res = client
        .get(format!("{}/admin/products", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn checkout_places_order_decrements_stock_and_tracks() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = sign_in(&client, &srv.base_url).await;

    let widget = create_product(&client, &srv.base_url, &token, "widget", 1000, 10).await;
    let gadget = create_product(&client, &srv.base_url, &token, "gadget", 500, 10).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "customer_name": "Ada Lovelace",
            "customer_email": "Ada@Example.com",
            "items": [
                { "product_id": widget, "quantity": 2 },
                { "product_id": gadget, "quantity": 3 },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let order_id = body["order_id"].as_str().unwrap().to_string();
    assert_eq!(body["total_cents"].as_u64().unwrap(), 3500);
    assert_eq!(body["customer_email"].as_str().unwrap(), "ada@example.com");

    // Stock was decremented per line.
    let res = client
        .get(format!("{}/admin/products", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    for item in body["items"].as_array().unwrap() {
        match item["name"].as_str().unwrap() {
            "widget" => assert_eq!(item["stock"].as_i64().unwrap(), 8),
            "gadget" => assert_eq!(item["stock"].as_i64().unwrap(), 7),
            other => panic!("unexpected product {other}"),
        }
    }

    // Track by id.
    let res = client
        .get(format!("{}/orders/track?id={}", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"].as_str().unwrap(), "pending");
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    let timeline = body["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 4);
    assert_eq!(timeline[0]["status"].as_str().unwrap(), "pending");
    assert!(timeline[0]["active"].as_bool().unwrap());
    assert!(timeline[0]["passed"].as_bool().unwrap());
    assert!(!timeline[1]["passed"].as_bool().unwrap());

    // Track by email, case-insensitive.
    let res = client
        .get(format!(
            "{}/orders/track?email=ADA@example.com",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"].as_str().unwrap(), order_id);
}

#[tokio::test]
async fn checkout_rejects_quantities_above_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = sign_in(&client, &srv.base_url).await;

    let widget = create_product(&client, &srv.base_url, &token, "widget", 1000, 2).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "customer_name": "Ada",
            "customer_email": "ada@example.com",
            "items": [{ "product_id": widget, "quantity": 5 }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Nothing was written.
    let res = client
        .get(format!(
            "{}/orders/track?email=ada@example.com",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_status_updates_are_permissive() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = sign_in(&client, &srv.base_url).await;

    let widget = create_product(&client, &srv.base_url, &token, "widget", 1000, 5).await;
    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "customer_name": "Ada",
            "customer_email": "ada@example.com",
            "items": [{ "product_id": widget, "quantity": 1 }],
        }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let order_id = body["order_id"].as_str().unwrap().to_string();

    for status in ["shipped", "pending", "delivered"] {
        let res = client
            .post(format!("{}/admin/orders/{}/status", srv.base_url, order_id))
            .bearer_auth(&token)
            .json(&json!({ "status": status }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client
        .post(format!("{}/admin/orders/{}/status", srv.base_url, order_id))
        .bearer_auth(&token)
        .json(&json!({ "status": "cancelled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Last write wins; the timeline reflects the final status.
    let res = client
        .get(format!("{}/orders/track?id={}", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"].as_str().unwrap(), "delivered");
    let timeline = body["timeline"].as_array().unwrap();
    assert!(timeline.iter().all(|s| s["passed"].as_bool().unwrap()));
}

#[tokio::test]
async fn stock_overview_reports_stats_and_sorted_alerts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = sign_in(&client, &srv.base_url).await;

    create_product(&client, &srv.base_url, &token, "plentiful", 100, 50).await;
    create_product(&client, &srv.base_url, &token, "scarce", 200, 3).await;
    create_product(&client, &srv.base_url, &token, "gone", 300, 0).await;

    let res = client
        .get(format!("{}/admin/stock", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    let stats = &body["stats"];
    assert_eq!(stats["total_products"].as_u64().unwrap(), 3);
    assert_eq!(stats["low_stock_count"].as_u64().unwrap(), 1);
    assert_eq!(stats["out_of_stock_count"].as_u64().unwrap(), 1);
    // 50*100 + 3*200 + 0*300
    assert_eq!(stats["total_value_cents"].as_u64().unwrap(), 5600);

    // Most urgent first: out-of-stock before low-stock.
    let alerts = body["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0]["name"].as_str().unwrap(), "gone");
    assert_eq!(alerts[1]["name"].as_str().unwrap(), "scarce");

    // The overview carries every product with its tier label.
    let overview = body["overview"].as_array().unwrap();
    assert_eq!(overview.len(), 3);
    assert!(overview
        .iter()
        .any(|p| p["name"] == "plentiful" && p["stock_status"] == "in-stock"));
}

#[tokio::test]
async fn tracking_requires_a_lookup_key() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/orders/track", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/orders/track?id=not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
